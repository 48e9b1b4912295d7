//! Merge rules: defaults, override order, conflict handling.

use crate::provider::client::{DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_SERVER_URL};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key, so a file that only sets
/// `connection.server` keeps every other default.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("connection.server", DEFAULT_SERVER_URL)?
        .set_default("connection.username", "root")?
        .set_default("connection.realm", "pam")?
        .set_default("connection.skip_tls_verify", false)?
        .set_default("connection.timeout_secs", DEFAULT_CALL_TIMEOUT_SECS)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
