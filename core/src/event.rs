//! Change notifications emitted on commit.

use crate::{ResourceId, ResourceKind, TenantId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::Updated => write!(f, "updated"),
            EventKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// One committed, externally visible state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: EventKind,
    pub resource_kind: ResourceKind,
    pub resource_id: ResourceId,
    pub tenant_id: TenantId,
}

impl ChangeEvent {
    pub fn new(kind: EventKind, resource_id: ResourceId, tenant_id: TenantId) -> Self {
        Self {
            kind,
            resource_kind: resource_id.kind(),
            resource_id,
            tenant_id,
        }
    }

    pub fn created(resource_id: ResourceId, tenant_id: TenantId) -> Self {
        Self::new(EventKind::Created, resource_id, tenant_id)
    }

    pub fn updated(resource_id: ResourceId, tenant_id: TenantId) -> Self {
        Self::new(EventKind::Updated, resource_id, tenant_id)
    }

    pub fn deleted(resource_id: ResourceId, tenant_id: TenantId) -> Self {
        Self::new(EventKind::Deleted, resource_id, tenant_id)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.resource_kind, self.resource_id)
    }
}
