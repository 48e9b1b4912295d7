//! Session Provider Abstraction
//!
//! Capability interface the inventory engine consumes. Any Proxmox-like HTTP
//! API can sit behind it; `client::PveClient` is the reqwest implementation.

use crate::error::ApiError;
use crate::resource::{ResourceRecord, VmRef};
use async_trait::async_trait;

pub mod client;

pub use client::{ClientSettings, PveClient, DEFAULT_CALL_TIMEOUT_SECS};

/// Remote API operations used by one inventory pass.
///
/// `login` must succeed before any other call; every call is attempted once.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Authenticate with a realm-qualified principal and optional one-time passcode.
    async fn login(&mut self, principal: &str, password: &str, otp: &str) -> Result<(), ApiError>;

    /// List cluster nodes.
    async fn node_list(&self) -> Result<Vec<ResourceRecord>, ApiError>;

    /// List storage pools visible from `node`.
    async fn list_storages(&self, node: &str) -> Result<Vec<ResourceRecord>, ApiError>;

    /// List guests across the cluster.
    async fn vm_list(&self) -> Result<Vec<ResourceRecord>, ApiError>;

    /// Resolve a guest name to its reference; missing or ambiguous names are errors.
    async fn vm_ref_by_name(&self, name: &str) -> Result<VmRef, ApiError>;

    /// Fetch the configuration record of a guest.
    async fn vm_config(&self, vm_ref: &VmRef) -> Result<ResourceRecord, ApiError>;

    /// Network interfaces as reported by the guest agent.
    async fn vm_agent_network_interfaces(
        &self,
        vm_ref: &VmRef,
    ) -> Result<Vec<ResourceRecord>, ApiError>;
}

/// Resolve `name` against a VM listing.
///
/// Shared by implementations that resolve references client-side.
pub fn resolve_vm_ref(vms: &[ResourceRecord], name: &str) -> Result<VmRef, ApiError> {
    let matches: Vec<&ResourceRecord> = vms
        .iter()
        .filter(|vm| vm.str_attr("name") == Some(name))
        .collect();
    match matches.as_slice() {
        [] => Err(ApiError::VmNotFound(name.to_string())),
        [vm] => VmRef::from_record(vm),
        many => Err(ApiError::AmbiguousVm {
            name: name.to_string(),
            count: many.len(),
        }),
    }
}
