//! Mutation operation implementations.
//!
//! Each operation (create, update, delete, bulk delete) is implemented
//! in its own module; the helpers below are shared between them.

mod bulk;
mod create;
mod delete;
mod update;

pub use bulk::execute_delete_all;
pub use create::execute_create;
pub use delete::execute_delete;
pub use update::execute_update;

use inv_core::{ChangeEvent, ResourceId, RowId, TenantId};
use inv_registry::{KindDef, OnDelete, Registry};
use inv_transaction::WriteTxn;

use crate::error::{MutationError, MutationResult};

/// Find a row by external id within the tenant.
///
/// A row owned by another tenant reads as missing.
pub(crate) fn find_in_tenant(
    txn: &WriteTxn<'_>,
    tenant: TenantId,
    id: &ResourceId,
) -> MutationResult<RowId> {
    txn.graph()
        .get_by_resource_id(id)
        .filter(|row| row.tenant_id == tenant)
        .map(|row| row.id)
        .ok_or_else(|| MutationError::not_found(id.kind(), id))
}

pub(crate) fn kind_def<'r>(registry: &'r Registry, id: &ResourceId) -> MutationResult<&'r KindDef> {
    registry
        .get_kind(id.kind())
        .ok_or(MutationError::UnknownKind(id.kind()))
}

/// Drop `target` from `source`'s `edge` and stamp the source.
pub(crate) fn unlink(
    txn: &mut WriteTxn<'_>,
    source: RowId,
    edge: &str,
    target: &ResourceId,
) -> MutationResult<()> {
    let remaining: Vec<ResourceId> = txn
        .graph()
        .get_row(source)
        .ok_or_else(|| MutationError::missing_row(source))?
        .links
        .get(edge)
        .map(|ids| ids.iter().filter(|id| *id != target).cloned().collect())
        .unwrap_or_default();
    txn.set_links(source, edge, remaining)?;
    txn.touch(source)?;
    Ok(())
}

/// Physically remove a row.
///
/// Every incoming link is checked first: a `Restrict` link refuses the
/// removal and names the relation; `Unlink` links are cleared on their
/// source, which is reported as updated.
pub(crate) fn hard_remove(
    registry: &Registry,
    txn: &mut WriteTxn<'_>,
    row_id: RowId,
) -> MutationResult<inv_graph::Row> {
    let graph = txn.graph();
    let row = graph
        .get_row(row_id)
        .ok_or_else(|| MutationError::missing_row(row_id))?;
    let target = row.resource_id.clone();
    let tenant = row.tenant_id;

    let mut incoming = Vec::new();
    for (edge, source) in graph.links_to(&target) {
        let Some(source_row) = graph.get_row(source) else {
            continue;
        };
        let policy = registry
            .get_edge(source_row.kind(), edge)
            .map(|e| e.on_delete)
            .unwrap_or_default();
        if source != row_id && policy == OnDelete::Restrict {
            let relation = registry
                .back_ref_name(source_row.kind(), edge)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.{}", source_row.kind().name(), edge));
            return Err(MutationError::restricted(
                &target,
                relation,
                &source_row.resource_id,
            ));
        }
        incoming.push((edge.to_string(), source, source_row.resource_id.clone()));
    }

    for (edge, source, source_id) in incoming {
        unlink(txn, source, &edge, &target)?;
        if source != row_id {
            txn.emit(ChangeEvent::updated(source_id, tenant));
        }
    }

    let removed = txn.remove(row_id)?;
    txn.emit(ChangeEvent::deleted(target, tenant));
    Ok(removed)
}
