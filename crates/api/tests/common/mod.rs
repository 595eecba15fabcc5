use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use visitlog_api::router::build_app_router;
use visitlog_api::config::ServerConfig;
use visitlog_api::state::AppState;
use visitlog_core::draft::ResetPolicy;
use visitlog_core::staff;
use visitlog_store::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the default staff roster.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        reset_policy: ResetPolicy::KeepOperatorDefaults,
        staff_roster: staff::default_roster(),
        display_offset_minutes: 540,
        session_idle_timeout_secs: 1800,
        max_sessions: 1000,
    }
}

/// Build the full application router backed by `store`.
///
/// Goes through the same `build_app_router` as `main.rs` so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_test_app_with(store, test_config())
}

pub fn build_test_app_with(store: Arc<MemoryStore>, config: ServerConfig) -> Router {
    build_app_router(AppState::new(store, config))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Open a session and return its id.
pub async fn open_session(app: &Router) -> String {
    let response = post_empty(app.clone(), "/api/v1/sessions").await;
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Set one draft field on a session, asserting success.
pub async fn set_field(app: &Router, id: &str, field: &str, value: &str) {
    let response = put_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/fields"),
        serde_json::json!({ "field": field, "value": value }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "set {field}");
}
