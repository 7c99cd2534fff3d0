//! Webhook Inspector
//!
//! A developer tool for testing webhook integrations.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────────┐
//!                         │               WEBHOOK INSPECTOR                │
//!                         │                                                │
//!   POST /webhook/receive │  ┌─────────┐    ┌───────────┐    ┌──────────┐  │
//!   ──────────────────────┼─▶│ webhook │───▶│ event log │───▶│   hub    │──┼──▶ GET /events
//!                         │  │ handler │    │ (append)  │    │ (fan-out)│  │    (SSE observers)
//!                         │  └─────────┘    └───────────┘    └──────────┘  │
//!                         │                                                │
//!   /configs CRUD         │  ┌─────────┐    ┌──────────────────────┐       │
//!   ──────────────────────┼─▶│ configs │───▶│ config store (JSON)  │───────┼──▶ configs.json
//!                         │  └─────────┘    └──────────────────────┘       │
//!                         │                                                │
//!   POST /webhook/send    │  ┌─────────┐                                   │
//!   ──────────────────────┼─▶│  relay  │───────────────────────────────────┼──▶ any URL
//!                         │  └─────────┘                                   │
//!                         └────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;

use webhook_inspector::config::loader::{apply_env_overrides, load_config};
use webhook_inspector::config::InspectorConfig;
use webhook_inspector::http::HttpServer;
use webhook_inspector::lifecycle::{shutdown_on_signal, Shutdown};
use webhook_inspector::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config path: first argument, else INSPECTOR_CONFIG, else built-in defaults.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INSPECTOR_CONFIG").ok())
        .map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => InspectorConfig::default(),
    };
    logging::init_logging(&config.observability.log_level);
    apply_env_overrides(&mut config);

    tracing::info!("webhook-inspector v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?config_path,
        bind_address = %config.server.bind_address,
        configs_path = %config.storage.configs_path,
        relay_timeout_secs = config.relay.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, shutdown).await?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
