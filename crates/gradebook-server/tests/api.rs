//! HTTP scenarios driven in-process through the router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // not axum::ServiceExt

use gradebook_server::{app_state::AppState, config, router::build_router};

fn app_with(cfg: config::GradebookConfig) -> (AppState, Router) {
    let state = AppState::new(cfg).unwrap();
    let app = build_router(state.clone());
    (state, app)
}

fn app() -> Router {
    app_with(config::GradebookConfig::default()).1
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn alice_lab() -> Value {
    json!({
        "student_name": "Alice Johnson",
        "student_id": "S001",
        "assignment_type": "lab",
        "assignment_name": "Lab 1",
        "submission_url": "https://x/1"
    })
}

async fn submit(app: &Router, body: Value) -> Value {
    let (status, rec) = send_json(app, Method::POST, "/assignments/submit", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    rec
}

#[tokio::test]
async fn health_is_always_healthy() {
    let (status, body) = send_json(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn root_reports_service_and_version() {
    let (status, body) = send_json(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assignment Submission API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn submit_get_grade_scenario() {
    let app = app();

    let rec = submit(&app, alice_lab()).await;
    assert_eq!(rec["student_name"], "Alice Johnson");
    assert_eq!(rec["assignment_type"], "lab");
    assert!(rec["grade"].is_null());
    assert!(rec["graded_at"].is_null());
    assert!(rec["submitted_at"].is_string());
    let id = rec["id"].as_str().unwrap().to_string();

    let (status, fetched) = send_json(&app, Method::GET, &format!("/assignments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, rec);

    let (status, graded) = send_json(
        &app,
        Method::PUT,
        &format!("/assignments/{id}/grade"),
        Some(json!({ "grade": 95.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graded["grade"], json!(95.0));
    assert!(graded["graded_at"].is_string());
    assert_eq!(graded["id"], rec["id"]);
    assert_eq!(graded["submitted_at"], rec["submitted_at"]);

    let (_, after) = send_json(&app, Method::GET, &format!("/assignments/{id}"), None).await;
    assert_eq!(after, graded);
}

#[tokio::test]
async fn submitted_ids_are_unique() {
    let app = app();
    let mut ids = HashSet::new();
    for _ in 0..20 {
        let rec = submit(&app, alice_lab()).await;
        assert!(ids.insert(rec["id"].as_str().unwrap().to_string()));
    }
}

#[tokio::test]
async fn unknown_assignment_type_is_rejected() {
    let mut body = alice_lab();
    body["assignment_type"] = json!("essay");

    let (status, err) = send_json(&app(), Method::POST, "/assignments/submit", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn missing_or_blank_fields_are_rejected() {
    let app = app();

    let mut missing = alice_lab();
    missing.as_object_mut().unwrap().remove("student_id");
    let (status, _) = send_json(&app, Method::POST, "/assignments/submit", Some(missing)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut blank = alice_lab();
    blank["assignment_name"] = json!("  ");
    let (status, err) = send_json(&app, Method::POST, "/assignments/submit", Some(blank)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err["message"].as_str().unwrap().contains("assignment_name"));

    let (status, _, _) = send(&app, Method::POST, "/assignments/submit", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn extra_fields_are_ignored() {
    let mut body = alice_lab();
    body["submitted_at"] = json!("1999-01-01T00:00:00");
    let rec = submit(&app(), body).await;
    assert_ne!(rec["submitted_at"], "1999-01-01T00:00:00");
}

#[tokio::test]
async fn get_unknown_is_404() {
    let app = app();
    let (status, err) = send_json(&app, Method::GET, "/assignments/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NOT_FOUND");

    let uri = format!("/assignments/{}", uuid::Uuid::new_v4());
    let (status, _) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn grading_errors() {
    let app = app();
    let id = submit(&app, alice_lab()).await["id"].as_str().unwrap().to_string();

    let uri = format!("/assignments/{}/grade", uuid::Uuid::new_v4());
    let (status, _) = send_json(&app, Method::PUT, &uri, Some(json!({ "grade": 50.0 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/assignments/{id}/grade");
    let (status, err) = send_json(&app, Method::PUT, &uri, Some(json!({ "grade": -1.0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "INVALID_INPUT");

    let (status, _) = send_json(&app, Method::PUT, &uri, Some(json!({ "grade": "A+" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, rec) = send_json(&app, Method::GET, &format!("/assignments/{id}"), None).await;
    assert!(rec["grade"].is_null());
    assert!(rec["graded_at"].is_null());
}

#[tokio::test]
async fn malformed_grade_body_wins_over_id_shape() {
    let app = app();
    let bad = json!({ "grade": "A+" });

    let (status, err) =
        send_json(&app, Method::PUT, "/assignments/not-a-uuid/grade", Some(bad.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "INVALID_INPUT");

    let uri = format!("/assignments/{}/grade", uuid::Uuid::new_v4());
    let (status, _) = send_json(&app, Method::PUT, &uri, Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/assignments/not-a-uuid/grade",
        Some(json!({ "grade": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn configured_max_grade_is_enforced() {
    let cfg = config::load_from_str("version: 1\ngrading:\n  max_grade: 100\n").unwrap();
    let (state, app) = app_with(cfg);
    assert_eq!(state.cfg().grading.max_grade, Some(100.0));
    assert_eq!(state.store().policy().max_grade, Some(100.0));

    let id = submit(&app, alice_lab()).await["id"].as_str().unwrap().to_string();
    let uri = format!("/assignments/{id}/grade");

    let (status, _) = send_json(&app, Method::PUT, &uri, Some(json!({ "grade": 101.0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send_json(&app, Method::PUT, &uri, Some(json!({ "grade": 100.0 }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_returns_everything_in_order_and_filters() {
    let app = app();
    let first = submit(&app, alice_lab()).await;

    let mut test = alice_lab();
    test["assignment_type"] = json!("test");
    test["student_id"] = json!("S002");
    let second = submit(&app, test).await;

    let third = submit(&app, alice_lab()).await;

    let (status, all) = send_json(&app, Method::GET, "/assignments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([first, second, third]));

    let (_, labs) = send_json(&app, Method::GET, "/assignments?assignment_type=lab", None).await;
    let labs = labs.as_array().unwrap();
    assert_eq!(labs.len(), 2);
    assert!(labs.iter().all(|r| r["assignment_type"] == "lab"));

    let (_, s002) = send_json(&app, Method::GET, "/assignments?student_id=S002", None).await;
    assert_eq!(s002, json!([second]));

    let uri = "/assignments?assignment_type=test&student_id=S001";
    let (_, none) = send_json(&app, Method::GET, uri, None).await;
    assert_eq!(none, json!([]));

    let uri = "/assignments?assignment_type=essay";
    let (status, _) = send_json(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (status, body) = send_json(&app(), Method::GET, "/assignments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn every_response_carries_a_fresh_request_id() {
    let app = app();
    let mut seen = HashSet::new();

    for uri in ["/health", "/assignments", "/assignments/nope", "/no/such/route", "/metrics"] {
        let (_, headers, _) = send(&app, Method::GET, uri, None).await;
        let id = headers
            .get("x-request-id")
            .unwrap_or_else(|| panic!("missing x-request-id on {uri}"))
            .to_str()
            .unwrap()
            .to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert!(seen.insert(id), "request id reused on {uri}");
    }
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = send_json(&app(), Method::GET, "/no/such/route", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn ready_flips_when_draining() {
    let (state, app) = app_with(config::GradebookConfig::default());

    let (status, body) = send_json(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    state.set_draining();
    let (status, body) = send_json(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "draining");

    let (status, _) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn middleware_records_metrics_by_route_template() {
    let (state, app) = app_with(config::GradebookConfig::default());

    send(&app, Method::GET, "/health", None).await;
    send(&app, Method::GET, "/health", None).await;
    send(&app, Method::GET, "/assignments/does-not-exist", None).await;
    send(&app, Method::GET, "/nowhere", None).await;

    let metrics = state.metrics();
    assert_eq!(
        metrics.requests.get(&[("method", "GET"), ("path", "/health"), ("status", "200")]),
        2
    );
    assert_eq!(
        metrics.requests.get(&[("method", "GET"), ("path", "/assignments/:id"), ("status", "404")]),
        1
    );
    assert_eq!(
        metrics.requests.get(&[("method", "GET"), ("path", "unmatched"), ("status", "404")]),
        1
    );
    assert_eq!(metrics.request_duration.count(&[("method", "GET"), ("path", "/health")]), 2);
    assert_eq!(metrics.in_flight.get(&[]), 0);
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let app = app();
    send(&app, Method::GET, "/health", None).await;
    submit(&app, alice_lab()).await;

    let (status, headers, body) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("# TYPE http_requests_total counter"));
    assert!(text.contains(r#"http_requests_total{method="GET",path="/health",status="200"} 1"#));
    let submitted =
        r#"http_requests_total{method="POST",path="/assignments/submit",status="201"} 1"#;
    assert!(text.contains(submitted));
    let inf_bucket =
        r#"http_request_duration_seconds_bucket{method="GET",path="/health",le="+Inf"} 1"#;
    assert!(text.contains(inf_bucket));
    assert!(text.contains(r#"http_request_duration_seconds_count{method="GET",path="/health"} 1"#));
    assert!(text.contains("gradebook_submissions 1\n"));
    assert!(text.contains("gradebook_submissions_graded 0\n"));
    assert!(text.contains("gradebook_draining 0\n"));
    assert!(text.contains("process_start_time_seconds "));
    assert!(text.contains("process_resident_memory_bytes "));
}
