//! End-to-end HTTP flows over the in-memory store: assignment counting,
//! ownership rules and error correlation.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use ayuda::outbound::memory::InMemoryStore;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

use support::{HELPER, OTHER_HELPER, RESIDENT, app, post_need, send, session_cookie};

#[fixture]
fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::default())
}

#[rstest]
#[actix_web::test]
async fn concurrent_assignments_are_both_counted(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store)).await;
    let resident = session_cookie(&app, RESIDENT).await;
    let helper = session_cookie(&app, HELPER).await;
    let other = session_cookie(&app, OTHER_HELPER).await;
    let id = post_need(&app, &resident, None).await;
    let uri = format!("/api/v1/help-requests/{id}/assignments");

    let (first, second) = futures_util::join!(
        send(&app, test::TestRequest::post().uri(&uri).cookie(helper)),
        send(&app, test::TestRequest::post().uri(&uri).cookie(other)),
    );
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::CREATED);

    let fetched = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/help-requests/{id}")),
    )
    .await;
    assert_eq!(fetched.body["asigneesCount"], 2);
    assert_eq!(fetched.body["assignmentState"], "assigned");

    let listed = send(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[actix_web::test]
async fn repeat_assignment_conflicts_without_moving_the_counter(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store)).await;
    let resident = session_cookie(&app, RESIDENT).await;
    let helper = session_cookie(&app, HELPER).await;
    let id = post_need(&app, &resident, None).await;
    let uri = format!("/api/v1/help-requests/{id}/assignments");

    let first = send(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(helper.clone())
            .set_json(json!({"phoneNumber": "611 000 000"})),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["phoneNumber"], "611 000 000");

    let repeat = send(&app, test::TestRequest::post().uri(&uri).cookie(helper)).await;
    assert_eq!(repeat.status, StatusCode::CONFLICT);
    assert_eq!(repeat.body["code"], "conflict");

    let fetched = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/help-requests/{id}")),
    )
    .await;
    assert_eq!(fetched.body["asigneesCount"], 1);
}

#[rstest]
#[actix_web::test]
async fn helpers_cannot_edit_someone_elses_need(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store)).await;
    let resident = session_cookie(&app, RESIDENT).await;
    let helper = session_cookie(&app, HELPER).await;
    let id = post_need(&app, &resident, None).await;

    let rejected = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/help-requests/{id}"))
            .cookie(helper)
            .set_json(json!({"status": "finished"})),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.body["code"], "forbidden");

    let fetched = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/help-requests/{id}")),
    )
    .await;
    assert_eq!(fetched.body["status"], "active");
}

#[rstest]
#[actix_web::test]
async fn unassigning_releases_the_need(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store)).await;
    let resident = session_cookie(&app, RESIDENT).await;
    let helper = session_cookie(&app, HELPER).await;
    let id = post_need(&app, &resident, None).await;

    let assigned = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/help-requests/{id}/assignments"))
            .cookie(helper.clone()),
    )
    .await;
    let assignment_id = assigned.body["id"].as_i64().expect("assignment id");

    let mine = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/me/help-requests")
            .cookie(helper.clone()),
    )
    .await;
    assert_eq!(mine.body[0]["id"], id);

    let removed = send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/assignments/{assignment_id}"))
            .cookie(helper),
    )
    .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let fetched = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/help-requests/{id}")),
    )
    .await;
    assert_eq!(fetched.body["asigneesCount"], 0);
    assert_eq!(fetched.body["assignmentState"], "open");
}

#[rstest]
#[actix_web::test]
async fn error_bodies_carry_the_response_trace_id(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store)).await;

    let missing = send(&app, test::TestRequest::get().uri("/api/v1/help-requests/999")).await;

    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    let header = missing.trace_id.expect("trace-id header");
    assert_eq!(missing.body["traceId"], header.as_str());
}

#[rstest]
#[actix_web::test]
async fn town_summary_counts_recent_activity(store: Arc<InMemoryStore>) {
    let app = test::init_service(app(store.clone())).await;
    let resident = session_cookie(&app, RESIDENT).await;

    let town = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/towns")
            .set_json(json!({"name": "Paiporta"})),
    )
    .await;
    let town_id = town.body["id"].as_i64().expect("town id");
    let quiet = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/towns")
            .set_json(json!({"name": "Alfafar"})),
    )
    .await;
    assert_eq!(quiet.status, StatusCode::OK);

    post_need(&app, &resident, Some(town_id)).await;
    let old = post_need(&app, &resident, Some(town_id)).await;
    assert!(store.backdate_request(ayuda::domain::HelpRequestId::new(old), 30));

    let summary = send(&app, test::TestRequest::get().uri("/api/v1/towns/summary")).await;
    assert_eq!(summary.status, StatusCode::OK);
    let rows = summary.body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["townName"], "Paiporta");
    assert_eq!(rows[0]["needsLast24h"], 1);
    assert_eq!(rows[0]["offersLast24h"], 0);
    assert_eq!(rows[0]["unassignedNeeds"], 2);
}
