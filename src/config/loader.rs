//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::InspectorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InspectorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InspectorConfig, ConfigError> {
    let config: InspectorConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of a loaded configuration.
///
/// `PORT` replaces the port of `server.bind_address`, keeping its host.
pub fn apply_env_overrides(config: &mut InspectorConfig) {
    if let Ok(port) = std::env::var("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => {
                let host = config
                    .server
                    .bind_address
                    .rsplit_once(':')
                    .map(|(host, _)| host.to_string())
                    .unwrap_or_else(|| "0.0.0.0".to_string());
                config.server.bind_address = format!("{}:{}", host, port);
            }
            Err(_) => {
                tracing::warn!(port = %port, "Ignoring invalid PORT environment variable");
            }
        }
    }
}
