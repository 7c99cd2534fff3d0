//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use webhook_inspector::config::InspectorConfig;
use webhook_inspector::http::HttpServer;
use webhook_inspector::lifecycle::Shutdown;

/// A running inspector on an ephemeral port.
#[allow(dead_code)]
pub struct TestInspector {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl TestInspector {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api{}", self.addr, path)
    }
}

impl Drop for TestInspector {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start an inspector with default settings and storage in a temp dir.
pub async fn start_inspector() -> TestInspector {
    start_inspector_with(|_| {}).await
}

/// Start an inspector after letting the caller adjust its configuration.
pub async fn start_inspector_with(tweak: impl FnOnce(&mut InspectorConfig)) -> TestInspector {
    let dir = tempfile::tempdir().unwrap();
    let mut config = InspectorConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.storage.configs_path = dir.path().join("configs.json").to_string_lossy().into_owned();
    config.relay.timeout_secs = 3;
    config.relay.use_system_proxy = false;
    config.events.keep_alive_secs = 1;
    tweak(&mut config);

    let shutdown = Shutdown::new();
    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, shutdown.clone()).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestInspector { addr, shutdown, dir }
}

/// How long the mock's `/slow` route stalls before answering.
#[allow(dead_code)]
pub const SLOW_UPSTREAM_DELAY: Duration = Duration::from_secs(5);

/// Bodies received by a mock upstream, in arrival order.
pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Start a mock webhook target.
///
/// - `POST /hook` → 201 with `{"received": <body>}`
/// - `POST /text` → 200 with plain `pong`
/// - `POST /fail` → 500 with `{"error": "boom"}`
/// - `POST /slow` → answers only after [`SLOW_UPSTREAM_DELAY`]
#[allow(dead_code)]
pub async fn start_mock_upstream() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    let hook_store = captured.clone();
    let app = Router::new()
        .route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let hook_store = hook_store.clone();
                async move {
                    hook_store.lock().unwrap().push(body.clone());
                    (StatusCode::CREATED, Json(json!({ "received": body })))
                }
            }),
        )
        .route("/text", post(|| async { "pong" }))
        .route(
            "/fail",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))) }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(SLOW_UPSTREAM_DELAY).await;
                "late"
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, captured)
}
