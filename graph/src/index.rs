//! Indexes for graph lookups.

use inv_core::{ResourceId, ResourceKind, RowId, TenantId, Value};
use std::collections::{BTreeSet, HashMap};

/// Scope index: (TenantId, ResourceKind) -> Set<RowId>
///
/// Ordered sets keep scans stable between calls.
#[derive(Debug, Default, Clone)]
pub struct ScopeIndex {
    index: HashMap<(TenantId, ResourceKind), BTreeSet<RowId>>,
}

impl ScopeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tenant: TenantId, kind: ResourceKind, row: RowId) {
        self.index.entry((tenant, kind)).or_default().insert(row);
    }

    pub fn remove(&mut self, tenant: TenantId, kind: ResourceKind, row: RowId) {
        let key = (tenant, kind);
        if let Some(set) = self.index.get_mut(&key) {
            set.remove(&row);
            if set.is_empty() {
                self.index.remove(&key);
            }
        }
    }

    pub fn get(&self, tenant: TenantId, kind: ResourceKind) -> impl Iterator<Item = RowId> + '_ {
        self.index
            .get(&(tenant, kind))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, tenant: TenantId, kind: ResourceKind) -> usize {
        self.index.get(&(tenant, kind)).map_or(0, BTreeSet::len)
    }
}

/// Simplified value for exact-match indexing.
/// Metadata lists are not indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
    Enum(String),
}

impl AttrValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Int(i) => Some(AttrValue::Int(*i)),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            Value::Enum(s) => Some(AttrValue::Enum(s.clone())),
            Value::Null | Value::Metadata(_) => None,
        }
    }
}

/// Key for the attribute index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub tenant: TenantId,
    pub kind: ResourceKind,
    pub field: String,
    pub value: AttrValue,
}

impl AttrKey {
    fn new(tenant: TenantId, kind: ResourceKind, field: &str, value: &Value) -> Option<Self> {
        AttrValue::from_value(value).map(|value| AttrKey {
            tenant,
            kind,
            field: field.to_string(),
            value,
        })
    }
}

/// Attribute index: (tenant, kind, field, value) -> Set<RowId>
#[derive(Debug, Default, Clone)]
pub struct AttributeIndex {
    exact: HashMap<AttrKey, BTreeSet<RowId>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        tenant: TenantId,
        kind: ResourceKind,
        field: &str,
        value: &Value,
        row: RowId,
    ) {
        if let Some(key) = AttrKey::new(tenant, kind, field, value) {
            self.exact.entry(key).or_default().insert(row);
        }
    }

    pub fn remove(
        &mut self,
        tenant: TenantId,
        kind: ResourceKind,
        field: &str,
        value: &Value,
        row: RowId,
    ) {
        if let Some(key) = AttrKey::new(tenant, kind, field, value) {
            if let Some(set) = self.exact.get_mut(&key) {
                set.remove(&row);
                if set.is_empty() {
                    self.exact.remove(&key);
                }
            }
        }
    }

    pub fn find_exact(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
        field: &str,
        value: &Value,
    ) -> impl Iterator<Item = RowId> + '_ {
        AttrKey::new(tenant, kind, field, value)
            .and_then(|key| self.exact.get(&key))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Reverse link index: target ResourceId -> Set<(edge name, source RowId)>
///
/// Keyed by resource id so a link may be indexed before its target row is
/// restored during rollback.
#[derive(Debug, Default, Clone)]
pub struct LinkIndex {
    inbound: HashMap<ResourceId, BTreeSet<(String, RowId)>>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: &ResourceId, edge: &str, source: RowId) {
        self.inbound
            .entry(target.clone())
            .or_default()
            .insert((edge.to_string(), source));
    }

    pub fn remove(&mut self, target: &ResourceId, edge: &str, source: RowId) {
        if let Some(set) = self.inbound.get_mut(target) {
            set.remove(&(edge.to_string(), source));
            if set.is_empty() {
                self.inbound.remove(target);
            }
        }
    }

    /// Links pointing at `target`, as (edge name, source row).
    pub fn links_to(&self, target: &ResourceId) -> impl Iterator<Item = (&str, RowId)> + '_ {
        self.inbound
            .get(target)
            .into_iter()
            .flat_map(|set| set.iter().map(|(edge, row)| (edge.as_str(), *row)))
    }

    pub fn is_referenced(&self, target: &ResourceId) -> bool {
        self.inbound.contains_key(target)
    }
}
