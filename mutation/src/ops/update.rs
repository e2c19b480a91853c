//! Update operation - applies the paths named by a field mask.
//!
//! Paths outside the mask are never read from the payload. A masked field
//! absent from the payload is cleared; a masked edge absent from the payload
//! is unlinked. Linking one member of a one-of group clears its siblings.

use inv_core::{ChangeEvent, ResourceId, ResourceInput, TenantId, Value};
use inv_hierarchy::HierarchyGuard;
use inv_registry::{DeletePolicy, EdgeDef, KindDef, Registry};
use inv_transaction::WriteTxn;
use std::collections::BTreeMap;
use tracing::debug;

use super::{find_in_tenant, hard_remove, kind_def};
use crate::edges::{check_exclusive, check_oneof, resolve_targets};
use crate::error::{MutationError, MutationResult};
use crate::executor::MutationConfig;
use crate::mask::{FieldMask, MaskPath};
use crate::result::UpdateOutcome;
use crate::validation::{check_unique, run_validators, validate_value};

/// Execute a field-mask update of `id` for `tenant`.
pub fn execute_update(
    registry: &Registry,
    txn: &mut WriteTxn<'_>,
    config: &MutationConfig,
    tenant: TenantId,
    id: &ResourceId,
    mask: &FieldMask,
    input: &ResourceInput,
) -> MutationResult<UpdateOutcome> {
    mask.check_shape()?;
    let row_id = find_in_tenant(txn, tenant, id)?;
    if input.kind != id.kind() {
        return Err(MutationError::KindMismatch);
    }
    if input.tenant_id != tenant {
        return Err(MutationError::TenantMismatch);
    }
    let def = kind_def(registry, id)?;
    let paths = mask.resolve(def)?;

    // ==================== Plan ====================

    let graph = txn.graph();
    let mut field_changes: Vec<(&str, Value)> = Vec::new();
    let mut link_changes: BTreeMap<&str, Vec<ResourceId>> = BTreeMap::new();

    for path in &paths {
        match path {
            MaskPath::Field(field) => {
                let value = match input.fields.get(&field.name) {
                    Some(value) => validate_value(def, field, value)?,
                    None if field.required => {
                        return Err(MutationError::missing_required(def.kind, &field.name))
                    }
                    None => Value::Null,
                };
                check_unique(graph, tenant, def, &field.name, &value, Some(row_id))?;
                field_changes.push((field.name.as_str(), value));
            }
            MaskPath::Edge(edge) => {
                let targets = planned_targets(graph, tenant, def, edge, input)?;
                link_changes.insert(edge.name.as_str(), targets);
            }
            MaskPath::Group(members) => {
                for edge in members {
                    let targets = planned_targets(graph, tenant, def, edge, input)?;
                    link_changes.insert(edge.name.as_str(), targets);
                }
            }
        }
    }

    check_planned_groups(def, &mut link_changes)?;
    for (name, targets) in &link_changes {
        if let Some(edge) = def.get_edge(name) {
            check_exclusive(graph, edge, targets, Some(row_id))?;
        }
    }

    // ==================== Apply ====================

    for (name, value) in field_changes {
        txn.set_field(row_id, name, value)?;
    }
    for (name, targets) in link_changes {
        // Clear before set so a one-to-one link is never doubled.
        txn.set_links(row_id, name, Vec::new())?;
        if !targets.is_empty() {
            txn.set_links(row_id, name, targets)?;
        }
    }

    // ==================== Verify ====================

    let row = txn
        .graph()
        .get_row(row_id)
        .ok_or_else(|| MutationError::missing_row(row_id))?;
    check_oneof(def, &row.links)?;
    run_validators(def, row)?;
    let eligible = def.delete_policy == DeletePolicy::TwoPhase && row.state_pair().removal_eligible();
    HierarchyGuard::new(registry, config.max_hierarchy_depth).check(txn.graph(), row_id)?;
    txn.touch(row_id)?;

    if eligible {
        debug!(%tenant, resource_id = %id, "both lifecycle states deleted, removing");
        let removed = hard_remove(registry, txn, row_id)?;
        return Ok(UpdateOutcome::Removed(removed));
    }

    debug!(%tenant, resource_id = %id, paths = mask.paths().len(), "resource updated");
    txn.emit(ChangeEvent::updated(id.clone(), tenant));
    Ok(UpdateOutcome::Updated(row_id))
}

fn planned_targets(
    graph: &inv_graph::Graph,
    tenant: TenantId,
    def: &KindDef,
    edge: &EdgeDef,
    input: &ResourceInput,
) -> MutationResult<Vec<ResourceId>> {
    let raw = input.edges.get(&edge.name).map(Vec::as_slice).unwrap_or(&[]);
    let targets = resolve_targets(graph, tenant, edge, raw)?;
    if edge.required && targets.is_empty() {
        return Err(MutationError::missing_required(def.kind, &edge.name));
    }
    Ok(targets)
}

/// Reject two linked members of one group; clear the unmasked siblings of
/// the member being linked.
fn check_planned_groups<'d>(
    def: &'d KindDef,
    link_changes: &mut BTreeMap<&'d str, Vec<ResourceId>>,
) -> MutationResult<()> {
    let linked: Vec<&EdgeDef> = def
        .edges
        .iter()
        .filter(|e| e.oneof.is_some())
        .filter(|e| link_changes.get(e.name.as_str()).is_some_and(|t| !t.is_empty()))
        .collect();

    for edge in &linked {
        let Some(group) = edge.oneof.as_deref() else {
            continue;
        };
        if linked
            .iter()
            .any(|other| other.name != edge.name && other.oneof.as_deref() == Some(group))
        {
            return Err(MutationError::OneofConflict {
                group: group.to_string(),
            });
        }
        for sibling in def.oneof_members(group) {
            link_changes.entry(sibling.name.as_str()).or_default();
        }
    }
    Ok(())
}
