//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the service objects (inspector, config store, relay client)
//! - Create the Axum Router with all `/api` handlers
//! - Wire up middleware (tracing, body limit, timeout, request ID)
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::InspectorConfig;
use crate::events::Inspector;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::{configs, error, events, health, webhook};
use crate::lifecycle::Shutdown;
use crate::relay::{RelayClient, RelayError};
use crate::store::{ConfigStore, StoreError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inspector: Inspector,
    pub store: Arc<ConfigStore>,
    pub relay: RelayClient,
    pub shutdown: Shutdown,
    /// Keep-alive interval for event streams.
    pub keep_alive: Duration,
}

/// Errors raised while assembling the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("config store: {0}")]
    Store(#[from] StoreError),

    #[error("relay client: {0}")]
    Relay(#[from] RelayError),
}

/// HTTP server for the webhook inspector.
pub struct HttpServer {
    router: Router,
    config: InspectorConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Opens (or creates) the config store document.
    pub async fn new(config: InspectorConfig, shutdown: Shutdown) -> Result<Self, ServerError> {
        let store = Arc::new(ConfigStore::open(&config.storage.configs_path).await?);
        let relay = RelayClient::new(&config.relay)?;

        let state = AppState {
            inspector: Inspector::new(),
            store,
            relay,
            shutdown,
            keep_alive: Duration::from_secs(config.events.keep_alive_secs),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &InspectorConfig, state: AppState) -> Router {
        // The event stream is long-lived, so it sits outside the timeout.
        let api = Router::new()
            .route("/health", get(health::get_health))
            .route("/configs", get(configs::list_configs).post(configs::save_config))
            .route(
                "/configs/{name}",
                get(configs::get_config).delete(configs::delete_config),
            )
            .route("/webhook/receive", post(webhook::receive_webhook))
            .route("/webhook/send", post(webhook::send_webhook))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .route("/events", get(events::stream_events))
            .fallback(error::route_not_found);

        let mut router = Router::new().nest("/api", api);
        if let Some(dir) = &config.server.static_dir {
            tracing::info!(dir = %dir, "Serving static files");
            router = router.fallback_service(ServeDir::new(dir));
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until
    /// shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            configs_path = %self.config.storage.configs_path,
            "HTTP server starting"
        );

        let shutdown = self.state.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_server() -> (tempfile::TempDir, HttpServer) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = InspectorConfig::default();
        config.storage.configs_path = dir.path().join("configs.json").to_string_lossy().into_owned();
        let server = HttpServer::new(config, Shutdown::new()).await.unwrap();
        (dir, server)
    }

    async fn call(server: &HttpServer, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = server.router().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_config_crud_roundtrip() {
        let (_dir, server) = test_server().await;

        let (status, body) =
            call(&server, Method::POST, "/api/configs", Some(json!({"name": " demo ", "rules": [{"a": 1}]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "name": "demo"}));

        let (status, body) = call(&server, Method::GET, "/api/configs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "names": ["demo"]}));

        let (status, body) = call(&server, Method::GET, "/api/configs/demo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "name": "demo", "rules": [{"a": 1}]}));

        let (status, body) = call(&server, Method::DELETE, "/api/configs/demo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, body) = call(&server, Method::GET, "/api/configs/demo", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_save_validation_errors() {
        let (_dir, server) = test_server().await;

        let (status, body) =
            call(&server, Method::POST, "/api/configs", Some(json!({"name": "   ", "rules": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        let (status, _) =
            call(&server, Method::POST, "/api/configs", Some(json!({"name": "x", "rules": "nope"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&server, Method::POST, "/api/configs", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/configs")
            .header("content-type", "application/json")
            .body(Body::from("{broken"))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_not_found() {
        let (_dir, server) = test_server().await;

        for uri in ["/api/configs/a/b", "/api/nope"] {
            let (status, body) = call(&server, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["ok"], false);
            assert_eq!(body["error"], format!("no route for {uri}"));
        }
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, server) = test_server().await;
        let (status, body) = call(&server, Method::DELETE, "/api/configs/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_receive_records_event() {
        let (_dir, server) = test_server().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/webhook/receive")
            .header("content-type", "application/json")
            .header("user-agent", "tests/1.0")
            .header("x-hub-signature", "sha256=abc")
            .body(Body::from(r#"{"foo":1}"#))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"ok": true, "id": 1}));

        let events = server.state().inspector.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body, json!({"foo": 1}));
        assert_eq!(events[0].headers.content_type.as_deref(), Some("application/json"));
        assert_eq!(events[0].headers.user_agent.as_deref(), Some("tests/1.0"));
    }

    #[tokio::test]
    async fn test_send_without_url_is_bad_request() {
        let (_dir, server) = test_server().await;
        let (status, body) =
            call(&server, Method::POST, "/api/webhook/send", Some(json!({"payload": {"a": 1}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = InspectorConfig::default();
        config.storage.configs_path = dir.path().join("configs.json").to_string_lossy().into_owned();
        config.server.max_body_size = 16;
        let server = HttpServer::new(config, Shutdown::new()).await.unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/webhook/receive")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(server.state().inspector.event_count(), 0);
    }
}
