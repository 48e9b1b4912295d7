//! Resource data model: loosely-typed records returned by the API, the
//! categories the tool can list, and VM references.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One remote object as an attribute map of dynamically-typed values.
///
/// Attribute accessors return keys in sorted order, so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord(Map<String, Value>);

impl ResourceRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON value; anything but an object is malformed.
    pub fn from_value(value: Value, category: &str) -> Result<Self, ApiError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ApiError::MalformedRecord {
                category: category.to_string(),
                reason: format!("expected an object, got {}", value_kind(&other)),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn u64_attr(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Identity value under `key`: must be present, a string, and non-empty.
    pub fn identity(&self, key: &str) -> Result<&str, ApiError> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s),
            Some(Value::String(_)) => Err(malformed(key, "identity is empty".to_string())),
            Some(other) => Err(malformed(
                key,
                format!("identity is a {}, not a string", value_kind(other)),
            )),
            None => Err(malformed(key, "identity is missing".to_string())),
        }
    }

    /// All attributes except `key`, in sorted key order.
    pub fn attributes_except<'a>(&'a self, key: &str) -> Vec<(&'a String, &'a Value)> {
        let mut attrs: Vec<(&String, &Value)> =
            self.0.iter().filter(|(k, _)| k.as_str() != key).collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));
        attrs
    }

    /// All attributes in sorted key order.
    pub fn attributes(&self) -> Vec<(&String, &Value)> {
        let mut attrs: Vec<(&String, &Value)> = self.0.iter().collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));
        attrs
    }
}

fn malformed(key: &str, reason: String) -> ApiError {
    ApiError::MalformedRecord {
        category: key.to_string(),
        reason,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

/// Categories of resources the enumerator knows how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Node,
    Storage,
    VirtualMachine,
}

impl ResourceCategory {
    /// Attribute naming each record of this category.
    pub fn identity_key(self) -> &'static str {
        match self {
            ResourceCategory::Node => "node",
            ResourceCategory::Storage => "storage",
            ResourceCategory::VirtualMachine => "name",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceCategory::Node => "node",
            ResourceCategory::Storage => "storage",
            ResourceCategory::VirtualMachine => "vm",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Object type requested by `list`. Clusters are recognized but not listable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Cluster,
    Category(ResourceCategory),
}

impl ListTarget {
    /// Parse an object-type token including short aliases and plurals.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "c" | "cluster" | "clusters" => Some(ListTarget::Cluster),
            "n" | "node" | "nodes" => Some(ListTarget::Category(ResourceCategory::Node)),
            "s" | "storage" | "storages" => Some(ListTarget::Category(ResourceCategory::Storage)),
            "v" | "vm" | "vms" => Some(ListTarget::Category(ResourceCategory::VirtualMachine)),
            _ => None,
        }
    }
}

/// Guest flavour as exposed in the `type` attribute of `/cluster/resources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestKind {
    Qemu,
    Lxc,
}

impl GuestKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "qemu" => Some(GuestKind::Qemu),
            "lxc" => Some(GuestKind::Lxc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GuestKind::Qemu => "qemu",
            GuestKind::Lxc => "lxc",
        }
    }
}

/// Resolved location of a guest: id, hosting node and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmRef {
    pub vmid: u64,
    pub node: String,
    pub kind: GuestKind,
}

impl VmRef {
    pub fn new(vmid: u64, node: impl Into<String>, kind: GuestKind) -> Self {
        Self {
            vmid,
            node: node.into(),
            kind,
        }
    }

    /// Build a reference from a `/cluster/resources` entry.
    pub fn from_record(record: &ResourceRecord) -> Result<Self, ApiError> {
        let vmid = record.u64_attr("vmid").ok_or_else(|| ApiError::MalformedRecord {
            category: "vm".to_string(),
            reason: "missing numeric vmid".to_string(),
        })?;
        let node = record.identity("node")?;
        let kind = record
            .str_attr("type")
            .and_then(GuestKind::parse)
            .unwrap_or(GuestKind::Qemu);
        Ok(Self::new(vmid, node, kind))
    }

    /// API path of the guest, relative to the server base URL.
    pub fn api_path(&self) -> String {
        format!("/nodes/{}/{}/{}", self.node, self.kind.as_str(), self.vmid)
    }
}

impl fmt::Display for VmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.node, self.kind.as_str(), self.vmid)
    }
}
