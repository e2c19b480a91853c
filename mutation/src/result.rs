//! Mutation result types.

use inv_core::RowId;
use inv_graph::Row;

/// Outcome of a single-resource delete.
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Physically removed; the final image of the row.
    Removed(Row),
    /// `desired_state` set to DELETED; the row stays until the reconciler
    /// reports it deleted too.
    SoftDeleted(RowId),
    /// Already marked for deletion. Nothing changed.
    AlreadyPending(RowId),
}

impl DeleteOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, DeleteOutcome::Removed(_))
    }
}

/// Outcome of a field-mask update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(RowId),
    /// Both lifecycle states reached DELETED, so the row was removed.
    Removed(Row),
}

impl UpdateOutcome {
    pub fn row_id(&self) -> RowId {
        match self {
            UpdateOutcome::Updated(id) => *id,
            UpdateOutcome::Removed(row) => row.id,
        }
    }
}
