//! HTTP gateway tests against an in-process mock backend: bearer
//! attachment, status-to-error mapping and the 401 session teardown.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use swapstation_ops::config::AppConfig;
use swapstation_ops::domain::ports::ApiGateway;
use swapstation_ops::domain::ApiError;
use swapstation_ops::{HttpApiGateway, SessionState, SessionStore, StaffProfile};

async fn ping(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer tok-1")
        .unwrap_or(false);
    let has_request_id = headers.contains_key("x-request-id");
    if authorized && has_request_id {
        Json(json!({ "data": { "pong": true } })).into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

async fn forbidden() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": { "message": "staff role required" } })),
    )
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "reservation gone" })))
}

async fn taken() -> impl IntoResponse {
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "already checked in" })),
    )
}

async fn echo(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    Json(body)
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({ "done": true }))
}

async fn reject(Query(params): Query<std::collections::HashMap<String, String>>) -> impl IntoResponse {
    let message = params
        .get("field")
        .map(|f| format!("{f} is required"))
        .unwrap_or_else(|| "bad request".to_string());
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

async fn start_backend() -> String {
    let app = Router::new()
        .route("/api/v1/ping", get(ping))
        .route("/api/v1/expired", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/api/v1/forbidden", get(forbidden))
        .route("/api/v1/missing", get(missing))
        .route("/api/v1/taken", post(taken))
        .route("/api/v1/echo", post(echo))
        .route("/api/v1/slow", get(slow))
        .route("/api/v1/reject", post(reject))
        .route("/api/v1/empty", get(|| async { StatusCode::NO_CONTENT }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway_for(base_url: &str) -> (HttpApiGateway, Arc<SessionStore>) {
    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    let session = Arc::new(SessionStore::new());
    session.sign_in(
        "tok-1",
        StaffProfile {
            name: "Linh".into(),
            role: "staff".into(),
        },
    );
    (HttpApiGateway::new(&config, session.clone()), session)
}

#[tokio::test]
async fn attaches_bearer_and_request_id() {
    let base = start_backend().await;
    let (gateway, _session) = gateway_for(&base);

    let value = gateway.get("api/v1/ping").await.unwrap();
    assert_eq!(value["data"]["pong"], true);
}

#[tokio::test]
async fn unauthorized_clears_session_and_broadcasts_expiry() {
    let base = start_backend().await;
    let (gateway, session) = gateway_for(&base);
    let state = session.subscribe();

    let err = gateway.get("api/v1/expired").await.unwrap_err();
    assert!(matches!(err, ApiError::AuthExpired));
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert_eq!(*state.borrow(), SessionState::Expired);
}

#[tokio::test]
async fn forbidden_keeps_the_session() {
    let base = start_backend().await;
    let (gateway, session) = gateway_for(&base);

    let err = gateway.get("api/v1/forbidden").await.unwrap_err();
    match err {
        ApiError::Forbidden(message) => assert_eq!(message, "staff role required"),
        other => panic!("expected forbidden, got {other}"),
    }
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let base = start_backend().await;
    let (gateway, _session) = gateway_for(&base);

    assert!(matches!(
        gateway.get("api/v1/missing").await.unwrap_err(),
        ApiError::NotFound(m) if m == "reservation gone"
    ));
    assert!(matches!(
        gateway.post("api/v1/taken", json!({})).await.unwrap_err(),
        ApiError::Conflict(m) if m == "already checked in"
    ));
    assert!(matches!(
        gateway
            .post("api/v1/reject?field=oldBatterySerial", json!({}))
            .await
            .unwrap_err(),
        ApiError::ValidationRejected(m) if m == "oldBatterySerial is required"
    ));
}

#[tokio::test]
async fn round_trips_json_bodies() {
    let base = start_backend().await;
    let (gateway, _session) = gateway_for(&base);

    let value = gateway
        .post("api/v1/echo", json!({ "qrPayload": "QR-1" }))
        .await
        .unwrap();
    assert_eq!(value["qrPayload"], "QR-1");
}

#[tokio::test]
async fn empty_body_decodes_as_null() {
    let base = start_backend().await;
    let (gateway, _session) = gateway_for(&base);

    let value = gateway.get("api/v1/empty").await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn cancelled_scope_aborts_inflight_call() {
    let base = start_backend().await;
    let (gateway, _session) = gateway_for(&base);

    let token = CancellationToken::new();
    let scoped = gateway.with_scope(token.clone());

    let call = tokio::spawn(async move { scoped.get("api/v1/slow").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let result = call.await.unwrap();
    assert!(matches!(result.unwrap_err(), ApiError::Cancelled));
}

#[tokio::test]
async fn connection_failures_are_network_errors() {
    // Nothing listens on this port
    let (gateway, _session) = gateway_for("http://127.0.0.1:1");

    let err = gateway.get("api/v1/ping").await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkOrServer(_)));
}
