//! Configuration System
//!
//! Layered configuration for connection defaults and logging: built-in
//! defaults, the user config file, an explicit `--config` file, then
//! `PVELIST_*` environment variables. Command-line flags are applied on top by
//! the CLI.

use crate::logging::LoggingConfig;
use crate::provider::client::{DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_SERVER_URL};
use crate::provider::ClientSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge_policy;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PvelistConfig {
    /// How to reach and authenticate against the API
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection defaults. Every field can be overridden from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Authentication realm appended to bare usernames
    #[serde(default = "default_realm")]
    pub realm: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub skip_tls_verify: bool,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_username() -> String {
    "root".to_string()
}

fn default_realm() -> String {
    "pam".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            username: default_username(),
            realm: default_realm(),
            password: None,
            skip_tls_verify: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConnectionConfig {
    /// Validate connection settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.trim().is_empty() {
            return Err("Server URL cannot be empty".to_string());
        }
        if !self.server.starts_with("http://") && !self.server.starts_with("https://") {
            return Err(format!(
                "Server URL must start with http:// or https://: {}",
                self.server
            ));
        }
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if self.realm.trim().is_empty() {
            return Err("Realm cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be at least one second".to_string());
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            server_url: self.server.clone(),
            skip_tls_verify: self.skip_tls_verify,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Connection(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Connection(msg) => write!(f, "Connection: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PvelistConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.connection.validate() {
            errors.push(ValidationError::Connection(e));
        }
        if self.logging.output == "file" && self.logging.file.is_none() {
            errors.push(ValidationError::Logging(
                "output 'file' requires logging.file".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
