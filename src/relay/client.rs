//! Outbound relay client.
//!
//! # Responsibilities
//! - POST a caller-supplied payload as JSON to a caller-supplied URL
//! - Report the remote status, status text and body verbatim
//! - Apply a total timeout and surface any transport failure as
//!   [`RelayError::Upstream`]
//!
//! No retries: a failed send is reported once and forgotten.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::observability::metrics;

/// Errors from a relay attempt.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Caller supplied no usable target.
    #[error("{0}")]
    InvalidInput(String),

    /// Network, protocol or timeout failure talking to the target.
    #[error("{0}")]
    Upstream(String),
}

/// What the target answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub status: u16,
    pub status_text: String,
    /// Decoded JSON when the body parses as JSON, else the raw text.
    pub body: Value,
}

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
}

impl RelayClient {
    /// Build a client from configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| RelayError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Send `payload` to `url` and return the remote answer.
    pub async fn send(&self, url: &str, payload: &Value) -> Result<RelayResponse, RelayError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RelayError::InvalidInput("url is required".to_string()));
        }

        tracing::debug!(url = %url, "Relaying webhook");

        let response = match self.client.post(url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe(&e);
                tracing::warn!(url = %url, error = %message, "Relay failed");
                metrics::record_relay("error");
                return Err(RelayError::Upstream(message));
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            metrics::record_relay("error");
            RelayError::Upstream(describe(&e))
        })?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        metrics::record_relay("ok");
        tracing::info!(url = %url, status = status.as_u16(), "Relay completed");

        Ok(RelayResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Flatten a reqwest error and its sources into one message.
fn describe(error: &reqwest::Error) -> String {
    let mut message = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else {
        error.to_string()
    };
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
