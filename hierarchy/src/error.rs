//! Hierarchy error types.

use inv_core::{Code, ResourceId, ResourceKind, RowId};
use thiserror::Error;

/// Result type for hierarchy checks.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Hierarchy violations.
///
/// Every caller-facing message contains "depth".
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("hierarchy cycle detected at {resource_id}: maximum depth {max} exceeded")]
    Cycle { resource_id: ResourceId, max: usize },

    #[error("hierarchy depth {depth} exceeds maximum depth {max} at {resource_id}")]
    TooDeep {
        resource_id: ResourceId,
        depth: usize,
        max: usize,
    },

    #[error("{resource_id} cannot be its own parent: maximum depth would be unbounded")]
    SelfParent { resource_id: ResourceId },

    #[error("kind {0} is not hierarchical")]
    NotHierarchical(ResourceKind),

    #[error("row {0} vanished during hierarchy walk")]
    MissingRow(RowId),
}

impl HierarchyError {
    pub fn code(&self) -> Code {
        match self {
            HierarchyError::Cycle { .. }
            | HierarchyError::TooDeep { .. }
            | HierarchyError::SelfParent { .. } => Code::InvalidArgument,
            HierarchyError::NotHierarchical(_) | HierarchyError::MissingRow(_) => Code::Internal,
        }
    }
}
