//! Desired/current lifecycle state pair used by two-phase delete.
//!
//! The store never reconciles state itself. It only reads the pair to decide
//! whether a resource is eligible for physical removal.

use crate::Value;

/// Field holding the state a client or operator wants the resource in.
pub const DESIRED_STATE_FIELD: &str = "desired_state";

/// Field holding the state last reported by the reconciler.
pub const CURRENT_STATE_FIELD: &str = "current_state";

/// Internal enum value shared by every kind for the deleted state.
pub const STATE_DELETED: &str = "DELETED";

/// One side of the lifecycle pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    /// No state recorded.
    Unspecified,
    /// Marked or reported as deleted.
    Deleted,
    /// Any other kind-specific state.
    Other(String),
}

impl LifecycleState {
    /// Read a state from a stored enum field.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_enum) {
            None => LifecycleState::Unspecified,
            Some(STATE_DELETED) => LifecycleState::Deleted,
            Some(other) => LifecycleState::Other(other.to_string()),
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, LifecycleState::Deleted)
    }
}

/// The desired/current pair carried by two-phase-delete kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePair {
    pub desired: LifecycleState,
    pub current: LifecycleState,
}

impl StatePair {
    pub fn new(desired: LifecycleState, current: LifecycleState) -> Self {
        Self { desired, current }
    }

    /// Hard removal is allowed only once both sides report deleted.
    pub fn removal_eligible(&self) -> bool {
        self.desired.is_deleted() && self.current.is_deleted()
    }

    /// Soft-deleted but not yet confirmed by the reconciler.
    pub fn pending_removal(&self) -> bool {
        self.desired.is_deleted() && !self.current.is_deleted()
    }
}
