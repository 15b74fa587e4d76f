//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, Resource, test, web};

use super::session::SessionContext;
use super::state::HttpState;
use super::{ApiResult, configure_api, json_config};
use crate::Trace;
use crate::domain::{Error, UserId};

pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const OTHER_USER_ID: &str = "9b2d7c1e-0f43-4c55-8a4e-5d1f0b6c7a21";

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn session_test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().wrap(test_session_middleware())
}

/// Full API under `/api/v1` plus [`sign_in_route`], wrapped in the trace
/// and session middleware.
pub fn api_test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .wrap(Trace)
        .service(sign_in_route())
        .service(web::scope("/api/v1").configure(configure_api))
}

async fn sign_in(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id =
        UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stand-in for the outer auth layer.
pub fn sign_in_route() -> Resource {
    web::resource("/test/sign-in/{user_id}").route(web::post().to(sign_in))
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
    assert!(res.status().is_success(), "sign-in failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
