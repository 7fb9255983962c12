#![cfg(feature = "axum")]

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{HeaderValue, Request, StatusCode},
    routing::post,
};
use chrono::{TimeDelta, Utc};
use eventdripper::webhooks::{self, VerifiedNotification};
use eventdripper::{HEADER_KEY, Notification, WebhookVerifier};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "whsec_integration";

async fn receive(VerifiedNotification(notification): VerifiedNotification) -> Json<Value> {
    Json(json!({
        "trigger_name": notification.trigger_name,
        "entity_id": notification.entity_id,
        "events": notification.events.len(),
    }))
}

fn app() -> Router {
    Router::new()
        .route("/webhook", post(receive))
        .with_state(WebhookVerifier::new(SECRET))
}

fn request(payload: &[u8], header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(header) = header {
        builder = builder.header(HEADER_KEY, header);
    }
    builder.body(Body::from(payload.to_vec())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn payload() -> Vec<u8> {
    serde_json::to_vec(&Notification::new("trigger-name", "entity-id")).unwrap()
}

#[tokio::test]
async fn test_verified_delivery_reaches_handler() {
    let payload = payload();
    let header = webhooks::sign(SECRET.as_bytes(), Utc::now(), &payload);

    let response = app().oneshot(request(&payload, Some(&header))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["trigger_name"], "trigger-name");
    assert_eq!(body["entity_id"], "entity-id");
    assert_eq!(body["events"], 0);
}

#[tokio::test]
async fn test_missing_header_is_bad_request() {
    let response = app().oneshot(request(&payload(), None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "webhook has no EventDripper-Signature header");
}

#[tokio::test]
async fn test_malformed_header_is_bad_request() {
    let response = app()
        .oneshot(request(&payload(), Some("t=not-a-number")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_ascii_header_is_invalid_not_missing() {
    let value = HeaderValue::from_bytes(b"t=1601036356,v1=\xff\xfe").unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(HEADER_KEY, value)
        .body(Body::from(payload()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "webhook has invalid EventDripper-Signature header");
}

#[tokio::test]
async fn test_signed_array_payload_is_bad_request() {
    let payload = br#"["trigger-name","entity-id",null]"#;
    let header = webhooks::sign(SECRET.as_bytes(), Utc::now(), payload);

    let response = app().oneshot(request(payload, Some(&header))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "webhook has invalid payload");
}

#[tokio::test]
async fn test_wrong_secret_is_unauthorized() {
    let payload = payload();
    let header = webhooks::sign(b"someone-else", Utc::now(), &payload);

    let response = app().oneshot(request(&payload, Some(&header))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "webhook had no valid signature");
}

#[tokio::test]
async fn test_stale_delivery_is_unauthorized() {
    let payload = payload();
    let header = webhooks::sign(SECRET.as_bytes(), Utc::now() - TimeDelta::hours(1), &payload);

    let response = app().oneshot(request(&payload, Some(&header))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_garbage_is_bad_request() {
    let payload = b"not json at all";
    let header = webhooks::sign(SECRET.as_bytes(), Utc::now(), payload);

    let response = app().oneshot(request(payload, Some(&header))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "webhook has invalid payload");
}

#[derive(Clone)]
struct AppState {
    verifier: WebhookVerifier,
}

impl axum::extract::FromRef<AppState> for WebhookVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

#[tokio::test]
async fn test_verifier_from_composite_state() {
    let app = Router::new()
        .route("/webhook", post(receive))
        .with_state(AppState {
            verifier: WebhookVerifier::new(SECRET),
        });

    let payload = payload();
    let header = webhooks::sign(SECRET.as_bytes(), Utc::now(), &payload);

    let response = app.oneshot(request(&payload, Some(&header))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
