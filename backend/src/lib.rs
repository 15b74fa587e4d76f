//! Aid coordination backend library.
//!
//! Help requests, their assignments, towns and delivery points behind a
//! hexagonal split: [`domain`] holds the entities, ports and services,
//! [`inbound`] exposes them over HTTP and [`outbound`] provides PostgreSQL
//! and in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
/// Tracing middleware attaching a request-scoped trace identifier.
pub use middleware::Trace;
