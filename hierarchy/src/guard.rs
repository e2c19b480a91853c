//! Cycle and depth enforcement for self-referential kinds.
//!
//! A parent change can alter the depth of nodes far from the edited edge
//! (two subtrees merging, a subtree moving under a deep node), so the guard
//! collects the whole connected component of the mutated node and walks
//! every member up to its root. Both walks keep a visited set, so a cycle
//! already present in storage terminates them.

use crate::{HierarchyError, HierarchyResult};
use inv_core::{ResourceKind, RowId};
use inv_graph::{Graph, Row};
use inv_registry::Registry;
use std::collections::{HashSet, VecDeque};
use tracing::warn;

/// Maximum number of levels in a tree; a root is level 1.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 5;

pub struct HierarchyGuard<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> HierarchyGuard<'r> {
    pub fn new(registry: &'r Registry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Check the component containing `row` after a structural change.
    ///
    /// Rows of non-hierarchical kinds pass trivially.
    pub fn check(&self, graph: &Graph, row: RowId) -> HierarchyResult<()> {
        let node = graph.get_row(row).ok_or(HierarchyError::MissingRow(row))?;
        let Some(parent_edge) = self.parent_edge(node.kind()) else {
            return Ok(());
        };

        if node.link(parent_edge) == Some(&node.resource_id) {
            return Err(HierarchyError::SelfParent {
                resource_id: node.resource_id.clone(),
            });
        }

        for member in self.component(graph, row, parent_edge) {
            self.depth_with(graph, member, parent_edge)?;
        }
        Ok(())
    }

    /// Level of `row` in its tree, root = 1.
    pub fn depth_of(&self, graph: &Graph, row: RowId) -> HierarchyResult<usize> {
        let node = graph.get_row(row).ok_or(HierarchyError::MissingRow(row))?;
        let parent_edge = self
            .parent_edge(node.kind())
            .ok_or(HierarchyError::NotHierarchical(node.kind()))?;
        self.depth_with(graph, row, parent_edge)
    }

    fn parent_edge(&self, kind: ResourceKind) -> Option<&'r str> {
        self.registry
            .get_kind(kind)
            .and_then(|def| def.hierarchy.as_ref())
            .map(|h| h.parent_edge.as_str())
    }

    /// Every row reachable from `start` through parent and child links.
    fn component(&self, graph: &Graph, start: RowId, parent_edge: &str) -> Vec<RowId> {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();

        while let Some(current) = queue.pop_front() {
            members.push(current);
            let Some(node) = graph.get_row(current) else {
                continue;
            };

            let parent = parent_of(graph, node, parent_edge);
            let children = children_of(graph, node, parent_edge);
            for next in parent.into_iter().chain(children) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        members
    }

    /// Walk upward from `row`, failing once the walk passes `max_depth`
    /// levels or revisits a node.
    fn depth_with(&self, graph: &Graph, row: RowId, parent_edge: &str) -> HierarchyResult<usize> {
        let mut visited = HashSet::from([row]);
        let mut current = row;
        let mut depth = 1;

        loop {
            let node = graph
                .get_row(current)
                .ok_or(HierarchyError::MissingRow(current))?;
            let Some(parent) = parent_of(graph, node, parent_edge) else {
                return Ok(depth);
            };

            depth += 1;
            if !visited.insert(parent) {
                let resource_id = node.resource_id.clone();
                warn!(%resource_id, "hierarchy cycle found in storage");
                return Err(HierarchyError::Cycle {
                    resource_id,
                    max: self.max_depth,
                });
            }
            if depth > self.max_depth {
                let resource_id = graph
                    .get_row(row)
                    .map(|r| r.resource_id.clone())
                    .unwrap_or_else(|| node.resource_id.clone());
                return Err(HierarchyError::TooDeep {
                    resource_id,
                    depth,
                    max: self.max_depth,
                });
            }
            current = parent;
        }
    }
}

fn parent_of(graph: &Graph, node: &Row, parent_edge: &str) -> Option<RowId> {
    node.link(parent_edge).and_then(|id| graph.lookup(id))
}

fn children_of<'g>(
    graph: &'g Graph,
    node: &Row,
    parent_edge: &str,
) -> impl Iterator<Item = RowId> + 'g {
    let kind = node.kind();
    graph
        .sources(&node.resource_id, parent_edge)
        .into_iter()
        .filter(move |id| graph.get_row(*id).is_some_and(|r| r.kind() == kind))
}
