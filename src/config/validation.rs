//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check addresses parse as socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InspectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::InspectorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &InspectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.server.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("'{}' is not a socket address ({})", config.server.bind_address, e),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.server.max_body_size == 0 {
        errors.push(ValidationError {
            field: "server.max_body_size",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.storage.configs_path.trim().is_empty() {
        errors.push(ValidationError {
            field: "storage.configs_path",
            message: "must not be empty".to_string(),
        });
    }

    if config.relay.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "relay.timeout_secs",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.events.keep_alive_secs == 0 {
        errors.push(ValidationError {
            field: "events.keep_alive_secs",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError {
                field: "observability.metrics_address",
                message: format!(
                    "'{}' is not a socket address ({})",
                    config.observability.metrics_address, e
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
