//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer together
//! with the request and response bodies they exchange. Domain types stay free
//! of utoipa; the error envelope is described by the wrappers in
//! [`crate::inbound::http::schemas`].
//!
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::delivery_points::{DeliveryPointResponse, RegisterDeliveryPointBody};
use crate::inbound::http::help_requests::{
    AssignBody, AssignmentResponse, CreateHelpRequestBody, EditHelpRequestBody,
    HelpRequestResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::towns::{CreateTownBody, TownResponse, TownSummaryResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the sign-in service sharing the session key.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ayuda aid coordination API",
        description = "Help requests, assignments, towns and delivery points.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::help_requests::create_help_request,
        crate::inbound::http::help_requests::get_help_request,
        crate::inbound::http::help_requests::edit_help_request,
        crate::inbound::http::help_requests::list_assignments,
        crate::inbound::http::help_requests::assign,
        crate::inbound::http::help_requests::unassign,
        crate::inbound::http::help_requests::my_help_requests,
        crate::inbound::http::help_requests::my_offers,
        crate::inbound::http::towns::list_towns,
        crate::inbound::http::towns::create_town,
        crate::inbound::http::towns::town_summary,
        crate::inbound::http::delivery_points::list_delivery_points,
        crate::inbound::http::delivery_points::register_delivery_point,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateHelpRequestBody,
        EditHelpRequestBody,
        AssignBody,
        HelpRequestResponse,
        AssignmentResponse,
        CreateTownBody,
        TownResponse,
        TownSummaryResponse,
        RegisterDeliveryPointBody,
        DeliveryPointResponse,
    )),
    tags(
        (name = "help-requests", description = "Needs and offers"),
        (name = "assignments", description = "Users claiming help requests"),
        (name = "towns", description = "Towns and their 24 hour activity"),
        (name = "delivery-points", description = "Logistics drop-off and pickup locations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
