//! API integration tests

use std::sync::Arc;

use autospec_booking::{
    api,
    store::{MemoryStore, Value},
    AppConfig, AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(AppConfig::default(), store.clone());
    (api::router(state), store)
}

fn jane() -> JsonValue {
    json!({
        "fullName": "Jane Doe",
        "email": "jane@example.com",
        "phone": "",
        "reg": "AB12CDE",
        "preferredDate": "2024-06-01",
        "motDue": "",
        "details": "",
        "consent": true
    })
}

async fn post_json(app: Router, body: JsonValue) -> (StatusCode, JsonValue) {
    let request = Request::post("/api/v1/bookings")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_store() {
    let (app, _) = app();
    let request = Request::get("/api/v1/ready").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_create_booking() {
    let (app, store) = app();

    let (status, body) = post_json(app, jane()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "New");
    assert_eq!(body["message"], "Thank you! Your booking request has been sent.");
    assert_eq!(body["dismissAfterMs"], 5000);

    let records = store.records("bookings");
    assert_eq!(records.len(), 1);
    let (id, record) = &records[0];
    assert_eq!(body["id"], id.0.as_str());
    assert_eq!(record["fullName"], Value::from("Jane Doe"));
    assert_eq!(record["status"], Value::from("New"));
    assert_eq!(record["consent"], Value::Bool(true));
    assert!(matches!(record["createdAt"], Value::Timestamp(_)));
}

#[tokio::test]
async fn test_missing_required_field() {
    let (app, store) = app();
    let mut draft = jane();
    draft["preferredDate"] = json!("");

    let (status, body) = post_json(app, draft).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingRequired");
    assert_eq!(
        body["message"],
        "Please make sure all required fields are filled out."
    );
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_invalid_email() {
    let (app, store) = app();
    let mut draft = jane();
    draft["email"] = json!("jane@example");

    let (status, body) = post_json(app, draft).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidEmail");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_store_failure_is_generic() {
    let (app, store) = app();
    store.set_failing(true);

    let (status, body) = post_json(app, jane()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "StoreFailure");
    assert_eq!(body["message"], "Sorry, something went wrong. Please try again.");
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_malformed_json() {
    let (app, store) = app();
    let request = Request::post("/api/v1/bookings")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_form_post() {
    let (app, store) = app();
    let form = "fullName=Jane+Doe&email=jane%40example.com&phone=&reg=bd10+svs\
                &preferredDate=2024-06-01&motDue=&details=Brakes+squeal&consent=on&website=";
    let request = Request::post("/api/v1/bookings/form")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let records = store.records("bookings");
    assert_eq!(records.len(), 1);
    let record = &records[0].1;
    assert_eq!(record["reg"], Value::from("BD10 SVS"));
    assert_eq!(record["details"], Value::from("Brakes squeal"));
    assert_eq!(record["consent"], Value::Bool(true));
    assert!(!record.contains_key("website"));
}

#[tokio::test]
async fn test_form_post_without_consent() {
    let (app, store) = app();
    let form = "fullName=Jane+Doe&email=jane%40example.com&reg=AB12CDE&preferredDate=2024-06-01";
    let request = Request::post("/api/v1/bookings/form")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingRequired");
    assert_eq!(store.calls(), 0);
}
