//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`; the
//! wrappers here mirror them for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No caller identity in the session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller may not act on this resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write collides with existing state, such as a repeat assignment.
    #[schema(rename = "conflict")]
    Conflict,
    /// The backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "location must not be blank")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "7b0c4a4e-5d9e-4c1e-9f55-0d6a8a3f1b2c")]
    trace_id: Option<String>,
    /// Field-level details, usually `{"field", "code"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::PartialSchema;

    use super::*;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn error_schema_matches_wire_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("details"));
    }
}
