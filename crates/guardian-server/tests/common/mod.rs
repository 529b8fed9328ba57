#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use guardian_server::app;
use guardian_server::state::AppState;
use serde_json::Value;
use tower::util::ServiceExt;

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

pub fn build_test_context() -> TestContext {
    let state = AppState::in_memory();
    let app = app::build_http_app(state.clone());
    TestContext { state, app }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub trace_id: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("body should be JSON")
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> TestResponse {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let (content_type, trace_id) = {
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        };
        (header("content-type"), header("x-trace-id"))
    };
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");

    TestResponse {
        status,
        content_type,
        trace_id,
        body: String::from_utf8_lossy(&bytes).to_string(),
    }
}

pub async fn request_no_body(app: &axum::Router, method: &str, uri: &str) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "text/plain")
        .body(Body::empty())
        .expect("request should build");
    send(app, req).await
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> TestResponse {
    request_raw_json(app, method, uri, body.to_string()).await
}

pub async fn request_raw_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: String,
) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .expect("request should build");
    send(app, req).await
}
