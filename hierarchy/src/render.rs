//! Inherited metadata rendering.
//!
//! A resource's rendered metadata is the union of the standalone metadata of
//! its ancestors in one lineage, nearest ancestor first. The resource's own
//! metadata field is not part of it and is never touched.

use inv_core::{MetadataPair, RowId, Value};
use inv_graph::{Graph, Row};
use inv_registry::{Lineage, Registry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Flattened inherited metadata, one list per lineage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMetadata {
    pub physical: Vec<MetadataPair>,
    pub logical: Vec<MetadataPair>,
}

impl RenderedMetadata {
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty() && self.logical.is_empty()
    }

    /// Look up a key in either lineage.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.physical
            .iter()
            .chain(&self.logical)
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

/// Render inherited metadata for `row`.
///
/// The chain follows the kind's inheritance path edge by edge, then climbs
/// the hierarchy of the last resource reached. The climb is bounded by
/// `max_depth` levels.
pub fn render_metadata(
    registry: &Registry,
    graph: &Graph,
    row: RowId,
    max_depth: usize,
) -> RenderedMetadata {
    let mut rendered = RenderedMetadata::default();
    let Some(node) = graph.get_row(row) else {
        return rendered;
    };
    let Some(inherits) = registry
        .get_kind(node.kind())
        .and_then(|def| def.inherits.as_ref())
    else {
        return rendered;
    };

    let chain = ancestors(registry, graph, node, max_depth);

    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    for ancestor in chain {
        let contributes = registry
            .get_kind(ancestor.kind())
            .is_some_and(|def| def.lineage == Some(inherits.lineage));
        if !contributes {
            continue;
        }
        let Some(metadata) = ancestor.get("metadata").and_then(Value::as_metadata) else {
            continue;
        };
        for pair in metadata.iter() {
            merged
                .entry(pair.key.clone())
                .or_insert_with(|| pair.value.clone());
        }
    }

    let pairs = merged
        .into_iter()
        .map(|(key, value)| MetadataPair { key, value })
        .collect();
    match inherits.lineage {
        Lineage::Physical => rendered.physical = pairs,
        Lineage::Logical => rendered.logical = pairs,
    }
    rendered
}

/// Ancestors of `node` along its kind's inheritance path, nearest first,
/// excluding `node` itself.
///
/// Kinds without an inheritance path still climb their own hierarchy.
pub fn ancestors<'g>(
    registry: &Registry,
    graph: &'g Graph,
    node: &'g Row,
    max_depth: usize,
) -> Vec<&'g Row> {
    let mut chain = Vec::new();
    let mut current = node;

    let path = registry
        .get_kind(node.kind())
        .and_then(|def| def.inherits.as_ref())
        .map(|inherits| inherits.path.as_slice())
        .unwrap_or(&[]);
    for edge in path {
        match current.link(edge).and_then(|id| graph.get_by_resource_id(id)) {
            Some(next) => {
                chain.push(next);
                current = next;
            }
            None => break,
        }
    }

    let Some(parent_edge) = registry
        .get_kind(current.kind())
        .and_then(|def| def.hierarchy.as_ref())
        .map(|h| h.parent_edge.as_str())
    else {
        return chain;
    };

    let mut visited = HashSet::from([current.id]);
    for _ in 0..max_depth {
        let Some(parent) = current
            .link(parent_edge)
            .and_then(|id| graph.get_by_resource_id(id))
        else {
            break;
        };
        if !visited.insert(parent.id) {
            warn!(resource_id = %parent.resource_id, "cycle while rendering metadata");
            break;
        }
        chain.push(parent);
        current = parent;
    }
    chain
}
