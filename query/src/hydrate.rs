//! Eager loading of linked resources.

use inv_core::Resource;
use inv_graph::{Graph, Row};
use inv_hierarchy::{render_metadata, RenderedMetadata};
use inv_registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::convert::to_resource;

/// A resource with its linked resources loaded and, at the top level, its
/// rendered metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedResource {
    pub resource: Resource,
    #[serde(default)]
    pub rendered_metadata: RenderedMetadata,
    /// Linked resources by edge name, present up to the hydration depth.
    #[serde(default)]
    pub linked: BTreeMap<String, Vec<HydratedResource>>,
}

impl HydratedResource {
    /// Linked resource of a one-cardinality edge.
    pub fn linked_one(&self, edge: &str) -> Option<&HydratedResource> {
        self.linked.get(edge).and_then(|items| items.first())
    }
}

pub(crate) struct Hydrator<'r, 'g> {
    registry: &'r Registry,
    graph: &'g Graph,
    depth: usize,
    max_hierarchy_depth: usize,
}

impl<'r, 'g> Hydrator<'r, 'g> {
    pub(crate) fn new(
        registry: &'r Registry,
        graph: &'g Graph,
        depth: usize,
        max_hierarchy_depth: usize,
    ) -> Self {
        Self {
            registry,
            graph,
            depth,
            max_hierarchy_depth,
        }
    }

    /// Hydrate `row` as a top-level result.
    pub(crate) fn hydrate(&self, row: &Row) -> HydratedResource {
        let mut hydrated = self.load(row, self.depth);
        hydrated.rendered_metadata =
            render_metadata(self.registry, self.graph, row.id, self.max_hierarchy_depth);
        hydrated
    }

    fn load(&self, row: &Row, remaining: usize) -> HydratedResource {
        let mut linked = BTreeMap::new();
        if remaining > 0 {
            for (edge, targets) in &row.links {
                let items: Vec<HydratedResource> = targets
                    .iter()
                    .filter_map(|id| self.graph.get_by_resource_id(id))
                    .filter(|target| target.tenant_id == row.tenant_id)
                    .map(|target| self.load(target, remaining - 1))
                    .collect();
                if !items.is_empty() {
                    linked.insert(edge.clone(), items);
                }
            }
        }
        HydratedResource {
            resource: to_resource(self.registry, row),
            rendered_metadata: RenderedMetadata::default(),
            linked,
        }
    }
}
