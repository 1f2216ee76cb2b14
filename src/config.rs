//! Database configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so
//! `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "identifier": "main",
//!   "read_only": false,
//!   "log_events": true,
//!   "log_level": "info"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Name used in log events and errors
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Reject write transactions
    #[serde(default)]
    pub read_only: bool,

    /// Emit transaction and object events
    #[serde(default)]
    pub log_events: bool,

    /// Minimum severity of emitted events: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_identifier() -> String {
    "default".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            read_only: false,
            log_events: false,
            log_level: default_log_level(),
        }
    }
}

impl DatabaseConfig {
    /// Config with a custom identifier
    pub fn named(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: DatabaseConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.identifier.trim().is_empty() {
            return Err(ConfigError::Invalid("identifier must not be empty".into()));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn or error.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Minimum severity of emitted events
    pub fn min_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}
