//! Error types for the Proxmox inventory tool.

use thiserror::Error;

/// Errors raised by the session provider, the enumerator and the CLI surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not logged in: no active session")]
    NotAuthenticated,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("{0} operations are not yet supported")]
    Unsupported(String),

    #[error("VM not found: {0}")]
    VmNotFound(String),

    #[error("VM name is ambiguous: {name} matches {count} guests")]
    AmbiguousVm { name: String, count: usize },

    #[error("Malformed {category} record: {reason}")]
    MalformedRecord { category: String, reason: String },

    #[error("Not available: {0}")]
    PartialDataUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A fatal failure at a named call site; see `policy::CallSite`.
    #[error("{site}: {source}")]
    Aborted {
        site: String,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Whether this error already went through the fatal branch of the error policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Aborted { .. })
    }

    /// Innermost error, unwrapping any `Aborted` context.
    pub fn root_cause(&self) -> &ApiError {
        match self {
            ApiError::Aborted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
