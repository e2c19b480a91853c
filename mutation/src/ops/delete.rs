//! Delete operation - the soft/hard delete state machine.

use inv_core::{ChangeEvent, ResourceId, TenantId, Value, DESIRED_STATE_FIELD, STATE_DELETED};
use inv_registry::{DeletePolicy, Registry};
use inv_transaction::WriteTxn;
use tracing::debug;

use super::{find_in_tenant, hard_remove, kind_def};
use crate::error::{MutationError, MutationResult};
use crate::result::DeleteOutcome;

/// Execute a delete of `id` for `tenant`.
///
/// Simple kinds are removed at once. Two-phase kinds are first marked
/// `desired_state = DELETED`; they are removed only when the current state
/// also reports DELETED.
pub fn execute_delete(
    registry: &Registry,
    txn: &mut WriteTxn<'_>,
    tenant: TenantId,
    id: &ResourceId,
) -> MutationResult<DeleteOutcome> {
    let row_id = find_in_tenant(txn, tenant, id)?;
    let def = kind_def(registry, id)?;

    if def.delete_policy == DeletePolicy::Simple {
        let removed = hard_remove(registry, txn, row_id)?;
        debug!(%tenant, resource_id = %id, "resource removed");
        return Ok(DeleteOutcome::Removed(removed));
    }

    let state = txn
        .graph()
        .get_row(row_id)
        .ok_or_else(|| MutationError::missing_row(row_id))?
        .state_pair();

    if state.current.is_deleted() {
        let removed = hard_remove(registry, txn, row_id)?;
        debug!(%tenant, resource_id = %id, "resource removed");
        return Ok(DeleteOutcome::Removed(removed));
    }
    if state.desired.is_deleted() {
        debug!(%tenant, resource_id = %id, "delete already pending");
        return Ok(DeleteOutcome::AlreadyPending(row_id));
    }

    txn.set_field(row_id, DESIRED_STATE_FIELD, Value::Enum(STATE_DELETED.to_string()))?;
    txn.touch(row_id)?;
    txn.emit(ChangeEvent::updated(id.clone(), tenant));
    debug!(%tenant, resource_id = %id, "resource marked for deletion");
    Ok(DeleteOutcome::SoftDeleted(row_id))
}
