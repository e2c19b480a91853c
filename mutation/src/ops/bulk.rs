//! Bulk delete of every resource of one kind in a tenant.

use inv_core::{
    ChangeEvent, ResourceId, ResourceKind, RowId, TenantId, Value, DESIRED_STATE_FIELD,
    STATE_DELETED,
};
use inv_graph::{Graph, Row};
use inv_registry::Registry;
use inv_transaction::WriteTxn;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

use super::unlink;
use crate::error::{MutationError, MutationResult};

/// Delete every `kind` row of `tenant`.
///
/// With `enforce` the rows are removed unconditionally, and links held by
/// rows outside the set are cleared. Without it every row is marked
/// `desired_state = DELETED`. Either way no row of the kind may be left
/// untouched once the operation finishes.
pub fn execute_delete_all(
    registry: &Registry,
    txn: &mut WriteTxn<'_>,
    tenant: TenantId,
    kind: ResourceKind,
    enforce: bool,
) -> MutationResult<Vec<Row>> {
    let def = registry
        .get_kind(kind)
        .ok_or(MutationError::UnknownKind(kind))?;
    if !enforce && !def.has_desired_state() {
        return Err(MutationError::SoftDeleteUnsupported(kind));
    }

    let scanned: Vec<RowId> = txn.graph().rows_in_scope(tenant, kind).collect();
    let affected = if enforce {
        remove_all(txn, tenant, &scanned)?
    } else {
        mark_all(txn, tenant, &scanned)?
    };

    let left = outstanding(txn.graph(), tenant, kind, enforce);
    if left > 0 {
        return Err(MutationError::CountMismatch {
            kind,
            expected: scanned.len(),
            actual: scanned.len().saturating_sub(left),
        });
    }
    info!(%tenant, %kind, rows = affected.len(), enforce, "bulk delete");
    Ok(affected)
}

fn remove_all(txn: &mut WriteTxn<'_>, tenant: TenantId, rows: &[RowId]) -> MutationResult<Vec<Row>> {
    let members: HashSet<RowId> = rows.iter().copied().collect();
    let images: Vec<Row> = rows
        .iter()
        .filter_map(|id| txn.graph().get_row(*id))
        .cloned()
        .collect();

    // Unlink every reference to the set, from inside or outside it.
    let mut outside: BTreeSet<RowId> = BTreeSet::new();
    for image in &images {
        let incoming: Vec<(String, RowId)> = txn
            .graph()
            .links_to(&image.resource_id)
            .map(|(edge, source)| (edge.to_string(), source))
            .collect();
        for (edge, source) in incoming {
            unlink(txn, source, &edge, &image.resource_id)?;
            if !members.contains(&source) {
                outside.insert(source);
            }
        }
    }
    for source in outside {
        let source_id: Option<ResourceId> =
            txn.graph().get_row(source).map(|r| r.resource_id.clone());
        if let Some(source_id) = source_id {
            txn.emit(ChangeEvent::updated(source_id, tenant));
        }
    }

    let mut removed = Vec::with_capacity(images.len());
    for image in images {
        txn.remove(image.id)?;
        txn.emit(ChangeEvent::deleted(image.resource_id.clone(), tenant));
        removed.push(image);
    }
    Ok(removed)
}

fn mark_all(txn: &mut WriteTxn<'_>, tenant: TenantId, rows: &[RowId]) -> MutationResult<Vec<Row>> {
    let mut marked = Vec::with_capacity(rows.len());
    for &id in rows {
        let Some(row) = txn.graph().get_row(id) else {
            continue;
        };
        let resource_id = row.resource_id.clone();
        if !row.state_pair().desired.is_deleted() {
            txn.set_field(id, DESIRED_STATE_FIELD, Value::Enum(STATE_DELETED.to_string()))?;
            txn.touch(id)?;
            txn.emit(ChangeEvent::updated(resource_id, tenant));
        }
        if let Some(row) = txn.graph().get_row(id) {
            marked.push(row.clone());
        }
    }
    Ok(marked)
}

/// Rows of the scope a bulk delete has not dealt with.
fn outstanding(graph: &Graph, tenant: TenantId, kind: ResourceKind, enforce: bool) -> usize {
    graph
        .rows_in_scope(tenant, kind)
        .filter(|id| {
            enforce
                || graph
                    .get_row(*id)
                    .is_some_and(|row| !row.state_pair().desired.is_deleted())
        })
        .count()
}
