//! Inventory Hierarchy
//!
//! Walks over self-referential trees and the lineage edges around them:
//! - Guard: acyclic, depth-bounded trees, checked over a whole connected component
//! - Render: inherited metadata, nearest ancestor wins
//! - Tree: upward ancestry of a set of resources

mod error;
mod guard;
mod render;
mod tree;

pub use error::{HierarchyError, HierarchyResult};
pub use guard::{HierarchyGuard, DEFAULT_MAX_HIERARCHY_DEPTH};
pub use render::{ancestors, render_metadata, RenderedMetadata};
pub use tree::{tree_hierarchy, TreeNode};
