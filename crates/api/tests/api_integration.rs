//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::routes::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    setup_with_state().0
}

fn setup_with_state() -> (axum::Router, Arc<AppState>) {
    let state = api::create_default_state();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn seeded() -> (axum::Router, Arc<AppState>) {
    let (app, state) = setup_with_state();
    domain::seed_sample_data(state.services.stores())
        .await
        .unwrap();
    (app, state)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-actor-username", "admin")
        .header("x-actor-id", "1")
        .header("x-forwarded-for", "203.0.113.9");
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = send(&app, request("GET", "/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["audit_pending"].is_number());
}

#[tokio::test]
async fn test_create_and_get_officer() {
    let app = setup();

    let response = send(
        &app,
        request(
            "POST",
            "/officers",
            Some(json!({
                "badge_number": "B100",
                "name": "Inspector Rao",
                "department": "CID"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["active_cases"], 0);
    let id = created["id"].as_i64().unwrap();

    let response = send(&app, request("GET", &format!("/officers/{id}"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["badge_number"], "B100");

    let response = send(&app, request("GET", "/officers/badge/B100", None)).await;
    assert_eq!(json_body(response).await["id"], id);
}

#[tokio::test]
async fn test_duplicate_badge_is_conflict() {
    let (app, _) = seeded().await;

    let response = send(
        &app,
        request(
            "POST",
            "/officers",
            Some(json!({ "badge_number": "B001", "name": "Impostor" })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("B001"));
}

#[tokio::test]
async fn test_missing_required_field_is_bad_request() {
    let app = setup();

    let response = send(
        &app,
        request("POST", "/criminals", Some(json!({ "name": "  " }))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_nonexistent_case_returns_404() {
    let app = setup();

    let response = send(&app, request("GET", "/cases/999", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_update_on_missing_case_returns_404() {
    let app = setup();

    let response = send(
        &app,
        request("PATCH", "/cases/999/status", Some(json!({ "status": "CLOSED" }))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fir_lookup_by_number_with_slashes() {
    let (app, _) = seeded().await;

    let response = send(&app, request("GET", "/firs/number/FIR/2024/002", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["fir_number"], "FIR/2024/002");
    assert_eq!(json["status"], "REGISTERED");
}

#[tokio::test]
async fn test_assign_fir_updates_workload() {
    let (app, _) = seeded().await;

    let response = send(&app, request("PATCH", "/firs/2/assign/2", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fir = json_body(response).await;
    assert_eq!(fir["status"], "UNDER_INVESTIGATION");
    assert_eq!(fir["assigned_officer_id"], 2);
    assert_eq!(fir["updated_by"], 1);

    let response = send(&app, request("GET", "/officers/2/workload", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let workload = json_body(response).await;
    assert_eq!(workload["officer"]["active_firs"], 1);
    assert_eq!(workload["firs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reassign_case_moves_counter() {
    let (app, _) = seeded().await;

    let response = send(&app, request("PATCH", "/cases/1/assign/2", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "PENDING");

    let first = json_body(send(&app, request("GET", "/officers/1", None)).await).await;
    let second = json_body(send(&app, request("GET", "/officers/2", None)).await).await;
    assert_eq!(first["active_cases"], 0);
    assert_eq!(second["active_cases"], 1);
}

#[tokio::test]
async fn test_list_filters() {
    let (app, _) = seeded().await;

    let firs = json_body(send(&app, request("GET", "/firs?status=REGISTERED", None)).await).await;
    assert_eq!(firs.as_array().unwrap().len(), 1);

    let cases = json_body(send(&app, request("GET", "/cases?officer_id=1", None)).await).await;
    assert_eq!(cases.as_array().unwrap().len(), 1);

    let criminals =
        json_body(send(&app, request("GET", "/criminals?name=priya", None)).await).await;
    assert_eq!(criminals[0]["name"], "Priya Singh");

    let officers =
        json_body(send(&app, request("GET", "/officers?department=cid", None)).await).await;
    assert_eq!(officers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (app, _) = seeded().await;

    let response = send(&app, request("DELETE", "/criminals/2", None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, request("GET", "/criminals/2", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_audit_records_actor_and_source() {
    let (app, state) = setup_with_state();

    let response = send(
        &app,
        request(
            "POST",
            "/users",
            Some(json!({ "username": "clerk", "email": "clerk@police.gov.in" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    state.services.audit().flush().await;

    let response = send(&app, request("GET", "/audit?entity_type=user&user_id=1", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = json_body(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "CREATE");
    assert_eq!(entries[0]["actor_username"], "admin");
    assert_eq!(entries[0]["source_address"], "203.0.113.9");
    assert_eq!(entries[0]["details"], "Created user: clerk");
}

#[tokio::test]
async fn test_audit_rejects_unknown_entity_type() {
    let app = setup();

    let response = send(&app, request("GET", "/audit?entity_type=vehicle", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recount_on_consistent_data_changes_nothing() {
    let (app, _) = seeded().await;

    let response = send(&app, request("POST", "/officers/recount", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    send(
        &app,
        request(
            "POST",
            "/criminals",
            Some(json!({ "name": "Metric Suspect" })),
        ),
    )
    .await;

    let response = send(&app, request("GET", "/metrics", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("domain_mutations_total"));
}
