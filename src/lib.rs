//! pvelist: Proxmox VE inventory
//!
//! Authenticates against the Proxmox VE HTTP API and prints human-readable
//! inventories of nodes, storage pools per node, and virtual machines with
//! their configuration and guest-agent network interfaces.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod policy;
pub mod provider;
pub mod render;
pub mod resource;
pub mod session;
