//! Shared helpers for HTTP integration tests.
//!
//! [`spawn_stub_ajax`] runs a throwaway Ajax API on an ephemeral port and
//! records every request it receives. [`CountingPanel`] stands in for the
//! Ajax client when only the call count matters.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use axum::{Json, Router};
use http_body_util::BodyExt;
use lockrelay::{router, AjaxClient, AppState, Config, RelayResult, SecurityPanel};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const TEST_INTEGRATION_ID: &str = "int-1";
pub const TEST_API_KEY: &str = "test-key";

// ============================================================================
// Config
// ============================================================================

/// Build a config from explicit variables; nothing is read from the process env.
pub fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

/// Complete Ajax config pointing at `base_url`.
pub fn ajax_config(base_url: &str) -> Config {
    config_from(&[
        ("AJAX_BASE_URL", base_url),
        ("AJAX_INTEGRATION_ID", TEST_INTEGRATION_ID),
        ("AJAX_API_KEY", TEST_API_KEY),
    ])
}

/// Router backed by a real [`AjaxClient`].
pub fn ajax_app(config: Config) -> Router {
    let config = Arc::new(config);
    let panel = Arc::new(AjaxClient::new(reqwest::Client::new(), config.clone()));
    router(AppState::new(config, panel))
}

// ============================================================================
// Fake panels
// ============================================================================

/// Counts unarm calls and always succeeds.
#[derive(Default)]
pub struct CountingPanel {
    calls: AtomicUsize,
}

impl CountingPanel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecurityPanel for CountingPanel {
    async fn unarm(&self) -> RelayResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "ok": true }))
    }
}

/// Panics on unarm.
pub struct PanickingPanel;

#[async_trait]
impl SecurityPanel for PanickingPanel {
    async fn unarm(&self) -> RelayResult<Value> {
        panic!("panel exploded");
    }
}

/// Router backed by a [`CountingPanel`], plus the panel for assertions.
pub fn counting_app() -> (Router, Arc<CountingPanel>) {
    let panel = Arc::new(CountingPanel::default());
    let config = Arc::new(ajax_config("http://ajax.invalid"));
    (router(AppState::new(config, panel.clone())), panel)
}

// ============================================================================
// Stub Ajax server
// ============================================================================

/// A request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Running stub server. Aborted on drop.
pub struct StubAjax {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    handle: JoinHandle<()>,
}

impl StubAjax {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Drop for StubAjax {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a stub that answers every request with `status`.
pub async fn spawn_stub_ajax(status: StatusCode) -> StubAjax {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        calls: calls.clone(),
    };
    let app = Router::new().fallback(record_call).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    StubAjax {
        base_url: format!("http://{addr}"),
        calls,
        handle,
    }
}

async fn record_call(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.calls.lock().unwrap().push(RecordedCall {
        method,
        path: uri.path().to_string(),
        api_key: header("x-api-key"),
        content_type: header("content-type"),
        body,
    });

    (state.status, Json(json!({ "state": "DISARMED" })))
}

// ============================================================================
// Requests
// ============================================================================

/// Build a request with a raw body.
pub fn request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap()
}

/// POST `body` to `/`.
pub fn post_json(body: &Value) -> Request<Body> {
    request(Method::POST, "/", serde_json::to_string(body).unwrap())
}

/// Send a request through the router via `tower::ServiceExt::oneshot`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
