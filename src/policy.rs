//! Error policy: every collaborator call site is either fatal (abort the run)
//! or tolerated (report inline and keep enumerating).

use crate::error::ApiError;
use std::fmt;
use std::io::Write;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Tolerated,
}

/// A logical collaborator call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSite {
    Login,
    ClusterList,
    NodeList,
    StorageList { node: String },
    VmList,
    VmRef { name: String },
    VmConfig { name: String },
    AgentInterfaces { name: String },
}

impl CallSite {
    /// The single classification table.
    pub fn severity(&self) -> Severity {
        match self {
            CallSite::AgentInterfaces { .. } => Severity::Tolerated,
            CallSite::Login
            | CallSite::ClusterList
            | CallSite::NodeList
            | CallSite::StorageList { .. }
            | CallSite::VmList
            | CallSite::VmRef { .. }
            | CallSite::VmConfig { .. } => Severity::Fatal,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Login => write!(f, "Failed to login"),
            CallSite::ClusterList => write!(f, "Failed to list clusters"),
            CallSite::NodeList => write!(f, "Failed to list nodes"),
            CallSite::StorageList { node } => {
                write!(f, "Failed to fetch storages for node {}", node)
            }
            CallSite::VmList => write!(f, "Failed to list VMs"),
            CallSite::VmRef { name } => write!(f, "Failed to get VM reference for {}", name),
            CallSite::VmConfig { name } => write!(f, "Failed to get VM config for {}", name),
            CallSite::AgentInterfaces { name } => {
                write!(f, "Failed to get agent network interfaces for {}", name)
            }
        }
    }
}

/// Short reason for an inline "not available" line.
fn unavailable_reason(err: &ApiError) -> String {
    match err {
        ApiError::PartialDataUnavailable(reason) => reason.clone(),
        other => other.to_string(),
    }
}

/// Apply the policy for `site` to a collaborator result.
///
/// Fatal failures come back as `ApiError::Aborted`; tolerated failures write
/// a `Not available` line to `out` and yield `Ok(None)`.
pub fn resolve<T, W: Write + ?Sized>(
    site: CallSite,
    result: Result<T, ApiError>,
    out: &mut W,
) -> Result<Option<T>, ApiError> {
    let err = match result {
        Ok(value) => return Ok(Some(value)),
        Err(err) => err,
    };
    match site.severity() {
        Severity::Fatal => Err(abort(site, err)),
        Severity::Tolerated => {
            info!(site = %site, error = %err, "tolerated call failure");
            writeln!(out, "\tNot available: {}", unavailable_reason(&err))?;
            Ok(None)
        }
    }
}

/// Shorthand for `resolve` at fatal sites, where there is never an inline report.
pub fn require<T>(site: CallSite, result: Result<T, ApiError>) -> Result<T, ApiError> {
    debug_assert_eq!(
        site.severity(),
        Severity::Fatal,
        "{} is reported inline; use resolve",
        site
    );
    result.map_err(|err| abort(site, err))
}

/// Wrap a failure with its call site. The binary prints it once on stderr.
fn abort(site: CallSite, err: ApiError) -> ApiError {
    debug!(site = %site, error = %err, "fatal call failure");
    ApiError::Aborted {
        site: site.to_string(),
        source: Box::new(err),
    }
}
