//! Stored resource rows.

use inv_core::{
    Attributes, EdgeMap, LifecycleState, ResourceId, ResourceKind, ResourceView, RowId, StatePair,
    TenantId, Timestamp, Value, CURRENT_STATE_FIELD, DESIRED_STATE_FIELD,
};

/// A resource as held by the arena.
///
/// Enum fields hold stored values, not external names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub resource_id: ResourceId,
    pub tenant_id: TenantId,
    pub fields: Attributes,
    pub links: EdgeMap,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Row {
    pub fn kind(&self) -> ResourceKind {
        self.resource_id.kind()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Target of a one-cardinality edge.
    pub fn link(&self, edge: &str) -> Option<&ResourceId> {
        self.links.get(edge).and_then(|ids| ids.first())
    }

    /// Every (edge, target) pair held by this row.
    pub fn all_links(&self) -> impl Iterator<Item = (&str, &ResourceId)> + '_ {
        self.links
            .iter()
            .flat_map(|(edge, ids)| ids.iter().map(move |id| (edge.as_str(), id)))
    }

    pub fn state_pair(&self) -> StatePair {
        StatePair::new(
            LifecycleState::from_value(self.fields.get(DESIRED_STATE_FIELD)),
            LifecycleState::from_value(self.fields.get(CURRENT_STATE_FIELD)),
        )
    }
}

impl ResourceView for Row {
    fn kind(&self) -> ResourceKind {
        self.resource_id.kind()
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn links(&self, edge: &str) -> &[ResourceId] {
        self.links.get(edge).map(Vec::as_slice).unwrap_or(&[])
    }
}
