//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the inspector.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the webhook inspector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InspectorConfig {
    /// HTTP server settings (bind address, limits, static UI).
    pub server: ServerConfig,

    /// Where named rule configs are persisted.
    pub storage: StorageConfig,

    /// Outbound relay client settings.
    pub relay: RelayConfig,

    /// Live event stream settings.
    pub events: EventsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Per-request timeout in seconds. Not applied to the event stream.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,

    /// Optional directory served at `/` (UI assets).
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            static_dir: None,
        }
    }
}

/// Config store persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON document holding name -> rules.
    pub configs_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            configs_path: "data/configs.json".to_string(),
        }
    }
}

/// Relay client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Total timeout for one outbound relay call, in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with relayed requests.
    pub user_agent: String,

    /// Honour HTTP(S)_PROXY environment variables for relayed requests.
    pub use_system_proxy: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("webhook-inspector/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
        }
    }
}

/// Event stream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Interval between keep-alive comments on idle streams, in seconds.
    pub keep_alive_secs: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { keep_alive_secs: 15 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
