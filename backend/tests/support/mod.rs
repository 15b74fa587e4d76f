//! Shared helpers for the HTTP integration tests.
//!
//! Integration tests compile as separate crates, so they cannot reach the
//! library's `cfg(test)` helpers. This module rebuilds the pieces they need:
//! an app over the in-memory store and a stand-in for the outer sign-in layer.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use ayuda::Trace;
use ayuda::domain::{Error, UserId};
use ayuda::inbound::http::session::SessionContext;
use ayuda::inbound::http::state::HttpState;
use ayuda::inbound::http::{ApiResult, configure_api, json_config};
use ayuda::outbound::memory::InMemoryStore;
use serde_json::Value;

pub const RESIDENT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const HELPER: &str = "9b2d7c1e-0f43-4c55-8a4e-5d1f0b6c7a21";
pub const OTHER_HELPER: &str = "c56a4180-65aa-42ec-a945-5fd21dec0538";

async fn sign_in(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id =
        UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// API under `/api/v1` plus `POST /test/sign-in/{user_id}`.
pub fn app(
    store: Arc<InMemoryStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(HttpState::in_memory(store)))
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
        .route("/test/sign-in/{user_id}", web::post().to(sign_in))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Sign in as `user_id` and return the session cookie.
pub async fn session_cookie<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{user_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT, "sign-in failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Captured response: status, `trace-id` header and JSON body (or `Null`).
pub struct Captured {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

pub async fn send<S>(app: &S, request: test::TestRequest) -> Captured
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Captured {
        status,
        trace_id,
        body,
    }
}

/// Post a need as `cookie`'s user and return its id.
pub async fn post_need<S>(app: &S, cookie: &Cookie<'static>, town_id: Option<i64>) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let created = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/help-requests")
            .cookie(cookie.clone())
            .set_json(serde_json::json!({
                "type": "necesita",
                "townId": town_id,
                "location": "Calle Valencia 12",
                "contactInfo": "600 111 222",
                "helpTypes": ["limpieza"]
            })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    created.body["id"].as_i64().expect("id")
}
