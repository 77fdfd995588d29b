//! API integration tests
//!
//! Each test starts an in-process fake of the field-sales backend on an
//! ephemeral port and drives the service router against it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fieldsales_manager::{
    api,
    config::{AppConfig, UpstreamConfig},
    repository::{ApiClient, Repository},
    AppState,
};

#[derive(Debug, Clone)]
struct RecordedPatch {
    visit_id: String,
    body: Value,
    request_id: Option<String>,
}

#[derive(Clone, Default)]
struct FakeBackend {
    visits: Arc<Mutex<Vec<Value>>>,
    patches: Arc<Mutex<Vec<RecordedPatch>>>,
}

fn role_for(headers: &HeaderMap) -> Option<&'static str> {
    match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        Some("session=manager-cookie") => Some("manager"),
        Some("session=rep-cookie") => Some("rep"),
        _ => None,
    }
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match role_for(&headers) {
        Some(role) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "user": {
                    "id": "m1",
                    "name": "Grace Otieno",
                    "email": "grace@acme.test",
                    "role": role
                },
                "company": { "id": "c1", "name": "Acme Distribution" }
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error": "Not signed in" })),
        ),
    }
}

async fn list_visits(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let exceptions_only = params
        .get("exceptions_only")
        .map(|v| v == "true")
        .unwrap_or(false);
    let region = params.get("region");
    let visits: Vec<Value> = backend
        .visits
        .lock()
        .unwrap()
        .iter()
        .filter(|v| {
            !exceptions_only
                || v["exception_reason"]
                    .as_str()
                    .map(|r| !r.is_empty())
                    .unwrap_or(false)
        })
        .filter(|v| region.map(|r| v["region"] == r.as_str()).unwrap_or(true))
        .cloned()
        .collect();
    Json(json!({ "ok": true, "visits": visits }))
}

async fn patch_visit(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.patches.lock().unwrap().push(RecordedPatch {
        visit_id: id.clone(),
        body: body.clone(),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let mut visits = backend.visits.lock().unwrap();
    let Some(visit) = visits.iter_mut().find(|v| v["id"] == id.as_str()) else {
        return Json(json!({ "ok": false, "error": "Visit not found" }));
    };
    let reviewed = !visit["approved_by_manager_id"].is_null()
        || !visit["flagged_by_manager_id"].is_null();
    if reviewed {
        return Json(json!({ "ok": false, "error": "Visit already reviewed" }));
    }
    if body["approve"] == true {
        visit["approved_by_manager_id"] = json!("m1");
        visit["approved_at"] = json!("2026-03-20T10:00:00Z");
    } else if body["flag"] == true {
        visit["flagged_by_manager_id"] = json!("m1");
    }
    if let Some(note) = body.get("managerNote") {
        visit["manager_note"] = note.clone();
    }
    Json(json!({ "ok": true }))
}

async fn at_risk() -> Json<Value> {
    Json(json!({
        "ok": true,
        "shops": [
            { "shop_id": "s1", "shop_name": "Mama Njeri", "days_since_last_visit": 13,
              "days_since_last_order": 3, "total_order_value_30d": 1200.5 },
            { "shop_id": "s2", "shop_name": "Kiosk 24", "days_since_last_visit": 14,
              "days_since_last_order": 30, "total_order_value_30d": 0 },
            { "shop_id": "s3", "shop_name": "New Duka", "days_since_last_visit": null,
              "days_since_last_order": null, "total_order_value_30d": 0 }
        ]
    }))
}

async fn leaderboard() -> Json<Value> {
    Json(json!({
        "ok": true,
        "reps": [
            { "rep_company_user_id": "a", "rep_name": "A", "visits_mtd": 40,
              "exception_rate_mtd": 12.5, "revenue_mtd": 100 },
            { "rep_company_user_id": "b", "rep_name": "B", "visits_mtd": 30,
              "exception_rate_mtd": 20, "revenue_mtd": 200 }
        ]
    }))
}

async fn coverage() -> Json<Value> {
    Json(json!({ "ok": true, "report": "not-a-list" }))
}

async fn flagged() -> Json<Value> {
    Json(json!({ "ok": false, "error": "Report not ready" }))
}

fn visit(id: &str, reason: Option<&str>, rep: &str) -> Value {
    json!({
        "id": id,
        "shop_id": "s1",
        "shop_name": "Mama Njeri",
        "rep_company_user_id": format!("rep-{}", rep.to_lowercase()),
        "rep_name": rep,
        "region": "north",
        "started_at": "2026-03-19T08:00:00Z",
        "ended_at": "2026-03-19T08:40:00Z",
        "is_verified": reason.is_none(),
        "exception_reason": reason,
        "distance_m": reason.map(|_| 310.0),
        "gps_accuracy_m": reason.map(|_| 25.0),
        "approved_by_manager_id": null,
        "flagged_by_manager_id": null
    })
}

async fn start_backend(backend: FakeBackend) -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/manager/visits", get(list_visits))
        .route("/api/manager/visits/:id", patch(patch_visit))
        .route("/api/manager/reports/at-risk", get(at_risk))
        .route("/api/manager/reports/leaderboard", get(leaderboard))
        .route("/api/manager/reports/coverage", get(coverage))
        .route("/api/manager/reports/flagged", get(flagged))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn service_for(addr: SocketAddr) -> Router {
    let config = AppConfig {
        upstream: UpstreamConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        },
        ..Default::default()
    };
    let client = ApiClient::new(&config.upstream).expect("client");
    api::create_router(AppState::new(config, Repository::new(client)))
}

async fn seeded() -> (FakeBackend, Router) {
    let backend = FakeBackend::default();
    {
        let mut visits = backend.visits.lock().unwrap();
        visits.push(visit("v0", None, "Amina"));
        visits.push(visit("v1", Some("gps_drift"), "Amina"));
        visits.push(visit("v2", Some("road_blocked"), "Kofi"));
    }
    let addr = start_backend(backend.clone()).await;
    (backend, service_for(addr))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(body) => {
            let raw = body.to_string();
            send_raw(app, method, uri, cookie, Some("application/json"), raw).await
        }
        None => send_raw(app, method, uri, cookie, None, String::new()).await,
    }
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

const MANAGER: Option<&str> = Some("session=manager-cookie");

/// GET as a signed-in manager
async fn fetch(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, MANAGER, None).await
}

#[tokio::test]
async fn test_health_check() {
    let (_, app) = seeded().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_cookie_is_unauthorized() {
    let (_, app) = seeded().await;
    let (status, body) = send(&app, "GET", "/api/v1/visits", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let expired = Some("session=expired");
    let (status, _) = send(&app, "GET", "/api/v1/visits", expired, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_endpoint() {
    let (_, app) = seeded().await;
    let (status, body) = fetch(&app, "/api/v1/session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "manager");
    assert_eq!(body["company"]["name"], "Acme Distribution");

    let (status, _) = send(&app, "POST", "/api/v1/session/refresh", MANAGER, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_visits_are_classified() {
    let (_, app) = seeded().await;
    let (status, body) = fetch(&app, "/api/v1/visits").await;
    assert_eq!(status, StatusCode::OK);
    let states: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["state"].as_str().unwrap())
        .collect();
    assert_eq!(states, vec!["verified", "exception_pending", "exception_pending"]);

    let (_, only) = fetch(&app, "/api/v1/visits?exceptions_only=true").await;
    assert_eq!(only.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_approve_flow() {
    let (backend, app) = seeded().await;

    let (_, queue) = fetch(&app, "/api/v1/visits/exceptions").await;
    assert_eq!(queue["pending_count"], 2);

    let (status, outcome) = send(
        &app,
        "POST",
        "/api/v1/visits/v1/approve",
        MANAGER,
        Some(json!({ "managerNote": "looks fine" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "exception_approved");
    assert_eq!(outcome["decision"], "approve");
    assert_eq!(outcome["pending_count"], 1);

    let patches = backend.patches.lock().unwrap().clone();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].visit_id, "v1");
    assert_eq!(
        patches[0].body.to_string(),
        r#"{"approve":true,"managerNote":"looks fine"}"#
    );
    assert!(patches[0].request_id.is_some());

    let (_, queue) = fetch(&app, "/api/v1/visits/exceptions").await;
    assert_eq!(queue["pending_count"], 1);
    assert_eq!(queue["visits"][0]["id"], "v2");
}

#[tokio::test]
async fn test_review_pending_count_follows_region() {
    let (backend, app) = seeded().await;
    {
        let mut south = visit("v3", Some("shop_moved"), "Kofi");
        south["region"] = json!("south");
        backend.visits.lock().unwrap().push(south);
    }

    let (_, queue) = fetch(&app, "/api/v1/visits/exceptions?region=north").await;
    assert_eq!(queue["pending_count"], 2);

    let uri = "/api/v1/visits/v1/approve?region=north";
    let (status, outcome) = send(&app, "POST", uri, MANAGER, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["pending_count"], 1);
    assert_eq!(backend.patches.lock().unwrap()[0].body.to_string(), r#"{"approve":true}"#);
}

#[tokio::test]
async fn test_second_review_is_rejected() {
    let (backend, app) = seeded().await;

    let (status, _) = send(&app, "POST", "/api/v1/visits/v2/flag", MANAGER, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/api/v1/visits/v2/approve", MANAGER, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ActionRejected");

    let (status, _) = send(&app, "POST", "/api/v1/visits/v2/flag", MANAGER, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(backend.patches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rep_cannot_review() {
    let (backend, app) = seeded().await;
    let rep = Some("session=rep-cookie");
    let (status, _) = send(&app, "POST", "/api/v1/visits/v1/approve", rep, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(backend.patches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_overlong_note_is_rejected() {
    let (backend, app) = seeded().await;
    let note = "x".repeat(1001);
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/visits/v1/flag",
        MANAGER,
        Some(json!({ "managerNote": note })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(backend.patches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_review_body_is_rejected() {
    let (backend, app) = seeded().await;
    let uri = "/api/v1/visits/v1/approve";
    let json = Some("application/json");

    let wrong_type = r#"{"managerNote":42}"#.to_string();
    let (status, body) = send_raw(&app, "POST", uri, MANAGER, json, wrong_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let truncated = r#"{"managerNote":"looks"#.to_string();
    let (status, _) = send_raw(&app, "POST", uri, MANAGER, json, truncated).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let plain = "looks fine".to_string();
    let (status, _) = send_raw(&app, "POST", uri, MANAGER, Some("text/plain"), plain).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(backend.patches.lock().unwrap().is_empty());

    let (_, queue) = fetch(&app, "/api/v1/visits/exceptions").await;
    assert_eq!(queue["pending_count"], 2);
}

#[tokio::test]
async fn test_at_risk_bands() {
    let (_, app) = seeded().await;
    let (status, body) = fetch(&app, "/api/v1/reports/at-risk").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["shop_id"], "s3");
    assert_eq!(rows[0]["last_visit"]["label"], "Never");
    assert_eq!(rows[1]["shop_id"], "s2");
    assert_eq!(rows[1]["last_visit"]["band"], "danger");
    assert_eq!(rows[1]["last_order"]["band"], "danger");
    assert_eq!(rows[2]["shop_id"], "s1");
    assert_eq!(rows[2]["last_visit"]["band"], "warn");
    assert_eq!(rows[2]["last_order"]["band"], "ok");
}

#[tokio::test]
async fn test_leaderboard_sort_asymmetry() {
    let (_, app) = seeded().await;

    let (_, by_rate) = fetch(&app, "/api/v1/reports/leaderboard?metric=exception_rate").await;
    assert_eq!(by_rate.as_array().unwrap().len(), 2);
    assert_eq!(by_rate[0]["rep_name"], "A");
    assert_eq!(by_rate[0]["rank"], 1);
    assert_eq!(by_rate[0]["exception_rate"], 13);

    let uri = "/api/v1/reports/leaderboard?metric=revenue&period=mtd";
    let (_, by_revenue) = fetch(&app, uri).await;
    assert_eq!(by_revenue[0]["rep_name"], "B");

    let (status, _) = fetch(&app, "/api/v1/reports/leaderboard?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_collection_renders_empty() {
    let (_, app) = seeded().await;
    let uri = "/api/v1/reports/coverage?dateFrom=2026-03-01&dateTo=2026-03-07";
    let (status, body) = fetch(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 0);
    assert_eq!(body["overall_pct"], 0);

    let inverted = "/api/v1/reports/coverage?dateFrom=2026-03-09&dateTo=2026-03-01";
    let (status, _) = fetch(&app, inverted).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_application_error() {
    let (_, app) = seeded().await;
    let (status, body) = fetch(&app, "/api/v1/reports/flagged").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "ApplicationError");
    assert_eq!(body["message"], "Report not ready");
}

#[tokio::test]
async fn test_backend_unreachable() {
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let app = service_for(closed);
    let (status, body) = fetch(&app, "/api/v1/session").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "NetworkFailure");
}

#[tokio::test]
async fn test_visit_summary() {
    let (_, app) = seeded().await;
    let (status, body) = fetch(&app, "/api/v1/visits/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["verified"], 1);
    assert_eq!(body["pending"], 2);
    assert_eq!(body["exception_rate"], 67);
    assert_eq!(body["reps"][0]["rep_name"], "Amina");
    assert_eq!(body["reps"][0]["compliance_pct"], 50);
}
