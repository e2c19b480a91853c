//! Upward ancestry of a set of resources.

use inv_core::{ResourceId, ResourceKind, RowId};
use inv_graph::{Graph, Row};
use inv_registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Lineage edges walked besides hierarchy parents.
static LINEAGE_EDGES: [(ResourceKind, &str); 3] = [
    (ResourceKind::Site, "region"),
    (ResourceKind::Site, "ou"),
    (ResourceKind::Host, "site"),
];

/// One resource in a tree-hierarchy answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub resource_id: ResourceId,
    /// Upward neighbours that exist in storage.
    pub parent_ids: Vec<ResourceId>,
    /// Distance from the nearest requested resource.
    pub depth: usize,
}

/// Walk upward from `roots` breadth-first.
///
/// Each resource appears once, at the depth it was first reached; the
/// requested resources come first at depth 0.
pub fn tree_hierarchy(registry: &Registry, graph: &Graph, roots: &[RowId]) -> Vec<TreeNode> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    for root in roots {
        if visited.insert(*root) {
            queue.push_back((*root, 0));
        }
    }

    let mut nodes = Vec::new();
    while let Some((current, depth)) = queue.pop_front() {
        let Some(row) = graph.get_row(current) else {
            continue;
        };

        let parents: Vec<&Row> = upward_edges(registry, row.kind())
            .filter_map(|edge| row.link(edge))
            .filter_map(|id| graph.get_by_resource_id(id))
            .collect();

        for parent in &parents {
            if visited.insert(parent.id) {
                queue.push_back((parent.id, depth + 1));
            }
        }
        nodes.push(TreeNode {
            resource_id: row.resource_id.clone(),
            parent_ids: parents.iter().map(|p| p.resource_id.clone()).collect(),
            depth,
        });
    }
    nodes
}

fn upward_edges(registry: &Registry, kind: ResourceKind) -> impl Iterator<Item = &str> + '_ {
    let parent = registry
        .get_kind(kind)
        .and_then(|def| def.hierarchy.as_ref())
        .map(|h| h.parent_edge.as_str());
    parent.into_iter().chain(
        LINEAGE_EDGES
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, edge)| *edge),
    )
}
