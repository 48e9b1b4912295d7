//! Resource enumeration: drives the session provider for one requested object
//! type and streams rendered blocks to the output as they arrive.
//!
//! Every call is awaited in program order; nothing is retried. Fatal failures
//! end the walk immediately, leaving whatever was already written in place.

use crate::error::ApiError;
use crate::policy::{self, CallSite};
use crate::provider::SessionProvider;
use crate::render;
use crate::resource::{ListTarget, ResourceCategory, ResourceRecord};
use std::io::Write;
use tracing::{debug, info, warn};

/// Counts for one enumeration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Top-level and nested records written to the output
    pub rendered: usize,
    /// Records dropped because their identity was missing or not a string
    pub skipped: usize,
}

/// List `target` through `provider`, writing human-readable blocks to `out`.
pub async fn list<P, W>(
    target: ListTarget,
    provider: &P,
    out: &mut W,
) -> Result<InventorySummary, ApiError>
where
    P: SessionProvider + ?Sized,
    W: Write + ?Sized,
{
    let mut summary = InventorySummary::default();
    match ensure_listable(target)? {
        ResourceCategory::Node => list_nodes(provider, out, &mut summary).await?,
        ResourceCategory::Storage => list_storages(provider, out, &mut summary).await?,
        ResourceCategory::VirtualMachine => list_vms(provider, out, &mut summary).await?,
    }
    out.flush()?;
    info!(
        rendered = summary.rendered,
        skipped = summary.skipped,
        "Inventory pass finished"
    );
    Ok(summary)
}

/// Reject object types the backend does not expose, before any call is made.
pub fn ensure_listable(target: ListTarget) -> Result<ResourceCategory, ApiError> {
    match target {
        ListTarget::Cluster => policy::require(
            CallSite::ClusterList,
            Err(ApiError::Unsupported("Cluster".to_string())),
        ),
        ListTarget::Category(category) => Ok(category),
    }
}

/// Write one rendered record, or skip it when its identity is malformed.
fn emit<W: Write + ?Sized>(
    out: &mut W,
    rendered: Result<String, ApiError>,
    summary: &mut InventorySummary,
) -> Result<(), ApiError> {
    match rendered {
        Ok(block) => {
            out.write_all(block.as_bytes())?;
            summary.rendered += 1;
            Ok(())
        }
        Err(err @ ApiError::MalformedRecord { .. }) => {
            warn!(error = %err, "Skipping malformed record");
            summary.skipped += 1;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Identity of `record`, or `None` (logged and counted) when malformed.
fn identity_or_skip<'a>(
    record: &'a ResourceRecord,
    category: ResourceCategory,
    summary: &mut InventorySummary,
) -> Option<&'a str> {
    match record.identity(category.identity_key()) {
        Ok(identity) => Some(identity),
        Err(err) => {
            warn!(category = %category, error = %err, "Skipping malformed record");
            summary.skipped += 1;
            None
        }
    }
}

async fn list_nodes<P, W>(
    provider: &P,
    out: &mut W,
    summary: &mut InventorySummary,
) -> Result<(), ApiError>
where
    P: SessionProvider + ?Sized,
    W: Write + ?Sized,
{
    let nodes = policy::require(CallSite::NodeList, provider.node_list().await)?;
    debug!(count = nodes.len(), "Fetched node list");
    let key = ResourceCategory::Node.identity_key();
    for node in &nodes {
        emit(out, render::format_record(node, key, 0), summary)?;
    }
    Ok(())
}

async fn list_storages<P, W>(
    provider: &P,
    out: &mut W,
    summary: &mut InventorySummary,
) -> Result<(), ApiError>
where
    P: SessionProvider + ?Sized,
    W: Write + ?Sized,
{
    let nodes = policy::require(CallSite::NodeList, provider.node_list().await)?;
    let storage_key = ResourceCategory::Storage.identity_key();
    for node in &nodes {
        let Some(node_name) = identity_or_skip(node, ResourceCategory::Node, summary) else {
            continue;
        };
        writeln!(out, "{}", node_name)?;
        // A failing node aborts the whole pass; later nodes are never queried.
        let storages = policy::require(
            CallSite::StorageList {
                node: node_name.to_string(),
            },
            provider.list_storages(node_name).await,
        )?;
        debug!(node = node_name, count = storages.len(), "Fetched storages");
        summary.rendered += 1;
        for storage in &storages {
            emit(out, render::format_record(storage, storage_key, 1), summary)?;
        }
    }
    Ok(())
}

async fn list_vms<P, W>(
    provider: &P,
    out: &mut W,
    summary: &mut InventorySummary,
) -> Result<(), ApiError>
where
    P: SessionProvider + ?Sized,
    W: Write + ?Sized,
{
    let vms = policy::require(CallSite::VmList, provider.vm_list().await)?;
    debug!(count = vms.len(), "Fetched VM list");
    let name_key = ResourceCategory::VirtualMachine.identity_key();
    for vm in &vms {
        let Some(name) = identity_or_skip(vm, ResourceCategory::VirtualMachine, summary) else {
            continue;
        };
        writeln!(out, "{}", name)?;
        writeln!(out, " Status:")?;
        out.write_all(render::format_attributes_except(vm, name_key, 1).as_bytes())?;

        let vm_ref = policy::require(
            CallSite::VmRef {
                name: name.to_string(),
            },
            provider.vm_ref_by_name(name).await,
        )?;
        let config = policy::require(
            CallSite::VmConfig {
                name: name.to_string(),
            },
            provider.vm_config(&vm_ref).await,
        )?;
        writeln!(out, " Config:")?;
        out.write_all(render::format_attributes(&config, 1).as_bytes())?;

        writeln!(out, " Agent network interfaces:")?;
        let interfaces = policy::resolve(
            CallSite::AgentInterfaces {
                name: name.to_string(),
            },
            provider.vm_agent_network_interfaces(&vm_ref).await,
            out,
        )?;
        if let Some(interfaces) = interfaces {
            out.write_all(render::format_sequence(&interfaces, 1).as_bytes())?;
        }
        summary.rendered += 1;
    }
    Ok(())
}
