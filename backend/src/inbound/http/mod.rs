//! HTTP inbound adapter exposing the aid coordination REST API.

pub mod delivery_points;
pub mod error;
pub mod health;
pub mod help_requests;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod towns;
mod validation;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// JSON extractor settings shared by every API route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler)
}

/// Register every `/api/v1` handler. Callers mount this inside the versioned
/// scope together with the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(help_requests::create_help_request)
        .service(help_requests::get_help_request)
        .service(help_requests::edit_help_request)
        .service(help_requests::list_assignments)
        .service(help_requests::assign)
        .service(help_requests::unassign)
        .service(help_requests::my_help_requests)
        .service(help_requests::my_offers)
        .service(towns::list_towns)
        .service(towns::create_town)
        .service(towns::town_summary)
        .service(delivery_points::list_delivery_points)
        .service(delivery_points::register_delivery_point);
}
