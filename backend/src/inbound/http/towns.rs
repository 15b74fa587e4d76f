//! Town HTTP handlers.
//!
//! ```text
//! GET  /api/v1/towns
//! POST /api/v1/towns
//! GET  /api/v1/towns/summary
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, Town, TownName, TownSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::required;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateTownBody {
    #[schema(example = "Paiporta")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TownResponse {
    pub id: i64,
    pub name: String,
}

impl From<Town> for TownResponse {
    fn from(value: Town) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.to_string(),
        }
    }
}

/// Activity over the last 24 hours for one town.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TownSummaryResponse {
    pub town_id: i64,
    pub town_name: String,
    pub offers_last_24h: u32,
    pub needs_last_24h: u32,
    /// Needs nobody has been assigned to yet, regardless of age.
    pub unassigned_needs: u32,
}

impl From<TownSummary> for TownSummaryResponse {
    fn from(value: TownSummary) -> Self {
        Self {
            town_id: value.town_id.get(),
            town_name: value.town_name,
            offers_last_24h: value.offers_last_24h,
            needs_last_24h: value.needs_last_24h,
            unassigned_needs: value.unassigned_needs,
        }
    }
}

fn parse_town_name(body: CreateTownBody) -> Result<TownName, Error> {
    let raw = required(body.name, "name")?;
    TownName::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "name",
            "code": "blank",
        }))
    })
}

/// List towns by name.
#[utoipa::path(
    get,
    path = "/api/v1/towns",
    responses(
        (status = 200, description = "Towns", body = [TownResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["towns"],
    operation_id = "listTowns"
)]
#[get("/towns")]
pub async fn list_towns(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TownResponse>>> {
    let towns = state.towns_query.list().await?;
    Ok(web::Json(towns.into_iter().map(TownResponse::from).collect()))
}

/// Return the town with this name, creating it first if needed.
#[utoipa::path(
    post,
    path = "/api/v1/towns",
    request_body = CreateTownBody,
    responses(
        (status = 200, description = "Existing or created town", body = TownResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["towns"],
    operation_id = "createTownIfNotExists"
)]
#[post("/towns")]
pub async fn create_town(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTownBody>,
) -> ApiResult<web::Json<TownResponse>> {
    let name = parse_town_name(payload.into_inner())?;
    let town = state.towns.create_if_not_exists(name).await?;
    Ok(web::Json(TownResponse::from(town)))
}

/// Per-town activity for towns with anything to report.
#[utoipa::path(
    get,
    path = "/api/v1/towns/summary",
    responses(
        (status = 200, description = "Town summaries", body = [TownSummaryResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["towns"],
    operation_id = "getTodaysCountByTown"
)]
#[get("/towns/summary")]
pub async fn town_summary(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TownSummaryResponse>>> {
    let summaries = state.help_requests_query.todays_count_by_town().await?;
    Ok(web::Json(
        summaries.into_iter().map(TownSummaryResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::test_utils::{TEST_USER_ID, api_test_app, session_cookie};
    use crate::outbound::memory::InMemoryStore;

    #[rstest]
    #[actix_web::test]
    async fn creating_a_town_twice_returns_the_same_town() {
        let store = Arc::new(InMemoryStore::default());
        let app = actix_test::init_service(api_test_app(HttpState::in_memory(store))).await;

        let first: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/towns")
                .set_json(json!({"name": " Catarroja "}))
                .to_request(),
        )
        .await;
        let second: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/towns")
                .set_json(json!({"name": "Catarroja"}))
                .to_request(),
        )
        .await;
        assert_eq!(first, second);
        assert_eq!(first.get("name").and_then(Value::as_str), Some("Catarroja"));

        let listed: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/towns").to_request(),
        )
        .await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    #[case(json!({"name": "  "}))]
    #[case(json!({}))]
    #[actix_web::test]
    async fn town_name_is_required(#[case] body: Value) {
        let store = Arc::new(InMemoryStore::default());
        let app = actix_test::init_service(api_test_app(HttpState::in_memory(store))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/towns")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            error.pointer("/details/field").and_then(Value::as_str),
            Some("name")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn summary_lists_only_active_towns() {
        let store = Arc::new(InMemoryStore::default());
        let app = actix_test::init_service(api_test_app(HttpState::in_memory(store))).await;
        let cookie = session_cookie(&app, TEST_USER_ID).await;

        let mut town_ids = Vec::new();
        for name in ["Sedaví", "Alfafar"] {
            let town: Value = actix_test::call_and_read_body_json(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/towns")
                    .set_json(json!({"name": name}))
                    .to_request(),
            )
            .await;
            town_ids.push(town.get("id").and_then(Value::as_i64).expect("town id"));
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/help-requests")
                .cookie(cookie)
                .set_json(json!({
                    "type": "necesita",
                    "townId": town_ids[0],
                    "location": "Sedaví",
                    "contactInfo": "600"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let summary: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/towns/summary")
                .to_request(),
        )
        .await;
        assert_eq!(
            summary,
            json!([{
                "townId": town_ids[0],
                "townName": "Sedaví",
                "offersLast24h": 0,
                "needsLast24h": 1,
                "unassignedNeeds": 1
            }])
        );
    }
}
