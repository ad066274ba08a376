//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Engine URL used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the engine URL.
pub const SERVER_URL_ENV: &str = "TWENTYQ_SERVER_URL";

/// Process-wide client configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the guessing engine's API.
    #[serde(default = "default_server_url")]
    server_url: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded");
        Ok(config)
    }

    /// Resolves the effective configuration.
    ///
    /// Precedence: explicit CLI value, then the `TWENTYQ_SERVER_URL`
    /// environment variable, then an optional config file, then the
    /// documented local default.
    #[instrument(skip_all)]
    pub fn resolve(
        cli_url: Option<String>,
        config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = cli_url {
            debug!(server_url = %url, "Using server URL from CLI");
            return Ok(Self { server_url: url });
        }

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            debug!(server_url = %url, "Using server URL from environment");
            return Ok(Self { server_url: url });
        }

        match config_path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => Err(ConfigError::new(format!(
                "Config file not found: {}",
                path.display()
            ))),
            None => {
                debug!(server_url = DEFAULT_SERVER_URL, "Using default server URL");
                Ok(Self::default())
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
