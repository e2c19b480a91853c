//! Create operation - validates a payload and stores a new resource.

use inv_core::{Attributes, ChangeEvent, ResourceId, ResourceInput, ResourceKind, RowId, TenantId};
use inv_graph::Graph;
use inv_hierarchy::HierarchyGuard;
use inv_registry::Registry;
use inv_transaction::WriteTxn;
use tracing::debug;

use crate::edges::{check_exclusive, check_oneof, resolve_edges};
use crate::error::{MutationError, MutationResult};
use crate::executor::MutationConfig;
use crate::validation::{
    apply_defaults, check_required, check_unique, run_validators, validate_value, Draft,
};

/// Execute a create for `tenant`.
pub fn execute_create(
    registry: &Registry,
    txn: &mut WriteTxn<'_>,
    config: &MutationConfig,
    tenant: TenantId,
    input: &ResourceInput,
) -> MutationResult<RowId> {
    if input.resource_id.is_some() {
        return Err(MutationError::ResourceIdOnCreate);
    }
    if input.tenant_id != tenant {
        return Err(MutationError::TenantMismatch);
    }
    let def = registry
        .get_kind(input.kind)
        .ok_or(MutationError::UnknownKind(input.kind))?;

    // Fields
    let mut fields = Attributes::new();
    for (name, value) in &input.fields {
        let field = def
            .get_field(name)
            .ok_or_else(|| MutationError::unknown_field(def.kind, name))?;
        let stored = validate_value(def, field, value)?;
        if !stored.is_null() {
            fields.insert(name.clone(), stored);
        }
    }
    apply_defaults(def, &mut fields);

    // Edges
    let graph = txn.graph();
    let links = resolve_edges(graph, tenant, def, &input.edges)?;
    check_required(def, &fields, &links)?;
    check_oneof(def, &links)?;
    for (name, targets) in &links {
        if let Some(edge) = def.get_edge(name) {
            check_exclusive(graph, edge, targets, None)?;
        }
    }

    for (name, value) in &fields {
        check_unique(graph, tenant, def, name, value, None)?;
    }
    run_validators(
        def,
        &Draft {
            kind: def.kind,
            fields: &fields,
            links: &links,
        },
    )?;

    let resource_id = allocate_id(graph, def.kind, config.id_generation_attempts)?;
    let row = txn.create_row(resource_id.clone(), tenant, fields, links)?;

    HierarchyGuard::new(registry, config.max_hierarchy_depth).check(txn.graph(), row)?;

    debug!(%tenant, %resource_id, "resource created");
    txn.emit(ChangeEvent::created(resource_id, tenant));
    Ok(row)
}

/// Draw random ids until one is free.
fn allocate_id(graph: &Graph, kind: ResourceKind, attempts: usize) -> MutationResult<ResourceId> {
    for _ in 0..attempts.max(1) {
        let candidate = ResourceId::generate(kind);
        if graph.lookup(&candidate).is_none() {
            return Ok(candidate);
        }
    }
    Err(MutationError::IdExhausted(kind))
}
