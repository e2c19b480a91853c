//! Resource envelopes.
//!
//! `Resource` is the stored, server-stamped view returned to callers.
//! `ResourceInput` is the client payload for create and update.
//! `ResourceView` is the read-only shape kind validators inspect.

use crate::{Attributes, Metadata, ResourceId, ResourceKind, TenantId, Timestamp, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outgoing edges by edge name. One-cardinality edges hold at most one id.
pub type EdgeMap = BTreeMap<String, Vec<ResourceId>>;

/// Read access to a resource's fields and links, independent of storage.
pub trait ResourceView {
    fn kind(&self) -> ResourceKind;

    fn field(&self, name: &str) -> Option<&Value>;

    fn links(&self, edge: &str) -> &[ResourceId];

    /// True when the field is present and not null.
    fn is_set(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| !v.is_null())
    }

    fn has_link(&self, edge: &str) -> bool {
        !self.links(edge).is_empty()
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_int)
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    fn enum_value(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_enum)
    }
}

/// A stored resource as seen by callers.
///
/// Enum fields carry their external names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: ResourceId,
    pub kind: ResourceKind,
    pub tenant_id: TenantId,
    pub fields: Attributes,
    pub edges: EdgeMap,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Resource {
    /// Get a field value. Missing fields read as `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Target of a one-cardinality edge.
    pub fn edge(&self, name: &str) -> Option<&ResourceId> {
        self.edges.get(name).and_then(|ids| ids.first())
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.fields.get("metadata").and_then(Value::as_metadata)
    }
}

impl ResourceView for Resource {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn links(&self, edge: &str) -> &[ResourceId] {
        self.edges.get(edge).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Client payload for create and update.
///
/// Edge targets are raw id strings; they are parsed and resolved inside the
/// owning transaction so a malformed or foreign id fails the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInput {
    pub kind: ResourceKind,
    pub tenant_id: TenantId,
    /// Must be unset on create.
    pub resource_id: Option<String>,
    pub fields: Attributes,
    pub edges: BTreeMap<String, Vec<String>>,
}

impl ResourceInput {
    pub fn new(kind: ResourceKind, tenant_id: TenantId) -> Self {
        Self {
            kind,
            tenant_id,
            resource_id: None,
            fields: Attributes::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Set a scalar field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set an enum field by external member name.
    pub fn enum_field(mut self, name: impl Into<String>, member: impl Into<String>) -> Self {
        self.fields.insert(name.into(), Value::Enum(member.into()));
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.fields
            .insert("metadata".to_string(), Value::Metadata(metadata));
        self
    }

    /// Link a one-cardinality edge, replacing any previous target.
    pub fn edge(mut self, name: impl Into<String>, target: impl ToString) -> Self {
        self.edges.insert(name.into(), vec![target.to_string()]);
        self
    }

    /// Append a target to a many-cardinality edge.
    pub fn add_edge(mut self, name: impl Into<String>, target: impl ToString) -> Self {
        self.edges
            .entry(name.into())
            .or_default()
            .push(target.to_string());
        self
    }

    /// Explicitly clear an edge.
    pub fn clear_edge(mut self, name: impl Into<String>) -> Self {
        self.edges.insert(name.into(), Vec::new());
        self
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }
}
