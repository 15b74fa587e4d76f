//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

fn field_error(field: &str, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(field, format!("missing required field: {field}"), ErrorCode::MissingField)
}

/// Require `value`, reporting `field` when absent.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse an optional wire enum, reporting `field` on unknown values.
pub(crate) fn parse_optional<T>(value: Option<String>, field: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| field_error(field, err.to_string(), ErrorCode::InvalidValue))
        })
        .transpose()
}
