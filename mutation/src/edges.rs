//! Edge target resolution.
//!
//! Targets arrive as raw id strings. Each is parsed against the edge's target
//! kind and resolved inside the caller's tenant; a target owned by another
//! tenant is indistinguishable from one that does not exist.

use inv_core::{EdgeMap, ResourceId, RowId, TenantId};
use inv_graph::Graph;
use inv_registry::{Cardinality, EdgeDef, KindDef};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MutationError, MutationResult};

/// Resolve the target list of one edge.
///
/// An empty list means "no link".
pub fn resolve_targets(
    graph: &Graph,
    tenant: TenantId,
    edge: &EdgeDef,
    raw: &[String],
) -> MutationResult<Vec<ResourceId>> {
    if edge.cardinality == Cardinality::One && raw.len() > 1 {
        return Err(MutationError::Cardinality {
            edge: edge.name.clone(),
            count: raw.len(),
        });
    }

    let mut targets = Vec::with_capacity(raw.len());
    for input in raw {
        let id = ResourceId::parse_as(edge.target, input)?;
        let owned = graph
            .get_by_resource_id(&id)
            .is_some_and(|row| row.tenant_id == tenant);
        if !owned {
            return Err(MutationError::edge_target_not_found(&edge.name, input.as_str()));
        }
        if !targets.contains(&id) {
            targets.push(id);
        }
    }
    Ok(targets)
}

/// Resolve every edge of a create payload. Empty lists are dropped.
pub fn resolve_edges(
    graph: &Graph,
    tenant: TenantId,
    def: &KindDef,
    raw: &BTreeMap<String, Vec<String>>,
) -> MutationResult<EdgeMap> {
    let mut links = EdgeMap::new();
    for (name, targets) in raw {
        let edge = def
            .get_edge(name)
            .ok_or_else(|| MutationError::unknown_field(def.kind, name))?;
        let resolved = resolve_targets(graph, tenant, edge, targets)?;
        if !resolved.is_empty() {
            links.insert(name.clone(), resolved);
        }
    }
    Ok(links)
}

/// At most one member of each one-of group may hold a target.
pub fn check_oneof(def: &KindDef, links: &EdgeMap) -> MutationResult<()> {
    let groups: BTreeSet<&str> = def.edges.iter().filter_map(|e| e.oneof.as_deref()).collect();
    for group in groups {
        let linked = def
            .oneof_members(group)
            .iter()
            .filter(|member| links.get(&member.name).is_some_and(|t| !t.is_empty()))
            .count();
        if linked > 1 {
            return Err(MutationError::OneofConflict {
                group: group.to_string(),
            });
        }
    }
    Ok(())
}

/// Reject targets of an exclusive edge already claimed by another source.
pub fn check_exclusive(
    graph: &Graph,
    edge: &EdgeDef,
    targets: &[ResourceId],
    source: Option<RowId>,
) -> MutationResult<()> {
    if !edge.exclusive {
        return Ok(());
    }
    for target in targets {
        let claimed = graph
            .sources(target, &edge.name)
            .into_iter()
            .any(|row| Some(row) != source);
        if claimed {
            return Err(MutationError::ExclusiveConflict {
                edge: edge.name.clone(),
                target: target.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inv_core::{attrs, now, Code, ResourceKind};
    use inv_registry::inventory_registry;

    fn stored(graph: &mut Graph, tenant: TenantId, kind: ResourceKind, links: EdgeMap) -> ResourceId {
        let id = ResourceId::generate(kind);
        graph
            .create_row(id.clone(), tenant, attrs!(), links, now())
            .unwrap();
        id
    }

    // ========== TEST: foreign_tenant_target_not_found ==========
    #[test]
    fn test_foreign_tenant_target_not_found() {
        // GIVEN a region owned by T1
        let registry = inventory_registry().unwrap();
        let mut graph = Graph::new();
        let (t1, t2) = (TenantId::random(), TenantId::random());
        let region = stored(&mut graph, t1, ResourceKind::Region, EdgeMap::new());
        let edge = registry.get_edge(ResourceKind::Site, "region").unwrap();

        // WHEN T2 links to it
        let err = resolve_targets(&graph, t2, edge, &[region.to_string()]).unwrap_err();

        // THEN NotFound, same as a missing id
        assert_eq!(err.code(), Code::NotFound);
        assert!(resolve_targets(&graph, t1, edge, &[region.to_string()]).is_ok());
    }

    // ========== TEST: wrong_prefix_rejected ==========
    #[test]
    fn test_wrong_prefix_rejected() {
        let registry = inventory_registry().unwrap();
        let graph = Graph::new();
        let edge = registry.get_edge(ResourceKind::Site, "region").unwrap();

        let err = resolve_targets(&graph, TenantId::random(), edge, &["host-0a0b0c0d".into()])
            .unwrap_err();

        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn test_single_edge_takes_one_target() {
        let registry = inventory_registry().unwrap();
        let graph = Graph::new();
        let edge = registry.get_edge(ResourceKind::Site, "region").unwrap();

        let err = resolve_targets(
            &graph,
            TenantId::random(),
            edge,
            &["region-00000001".into(), "region-00000002".into()],
        )
        .unwrap_err();

        assert!(matches!(err, MutationError::Cardinality { count: 2, .. }));
    }

    // ========== TEST: oneof_group_holds_one_target ==========
    #[test]
    fn test_oneof_group_holds_one_target() {
        let registry = inventory_registry().unwrap();
        let def = registry.get_kind(ResourceKind::SingleSchedule).unwrap();
        let mut links = EdgeMap::new();
        links.insert("target_site".into(), vec![ResourceId::generate(ResourceKind::Site)]);
        assert!(check_oneof(def, &links).is_ok());

        links.insert("target_host".into(), vec![ResourceId::generate(ResourceKind::Host)]);
        assert!(matches!(
            check_oneof(def, &links),
            Err(MutationError::OneofConflict { .. })
        ));
    }

    // ========== TEST: exclusive_edge_claimed_once ==========
    #[test]
    fn test_exclusive_edge_claimed_once() {
        // GIVEN instance I1 already on host H
        let registry = inventory_registry().unwrap();
        let mut graph = Graph::new();
        let t = TenantId::random();
        let host = stored(&mut graph, t, ResourceKind::Host, EdgeMap::new());
        let mut links = EdgeMap::new();
        links.insert("host".into(), vec![host.clone()]);
        let i1 = stored(&mut graph, t, ResourceKind::Instance, links);
        let i1_row = graph.lookup(&i1);
        let edge = registry.get_edge(ResourceKind::Instance, "host").unwrap();

        // THEN a second instance cannot claim H, but I1 may keep it
        let err = check_exclusive(&graph, edge, &[host.clone()], None).unwrap_err();
        assert_eq!(err.code(), Code::FailedPrecondition);
        assert!(check_exclusive(&graph, edge, &[host], i1_row).is_ok());
    }
}
