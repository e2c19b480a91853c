//! Inventory Filter Compiler
//!
//! Binds parsed filters and order-by lists against the schema registry.
//!
//! Responsibilities:
//! - Resolve every path segment to a field, edge or back-reference
//! - Enforce the traversal depth limit
//! - Translate enum literals to stored values
//! - Type-check literals and operators
//! - Allow-list `order_by` columns

mod compiler;
mod error;
mod predicate;

pub use compiler::{FilterCompiler, DEFAULT_MAX_FILTER_DEPTH};
pub use error::{CompileError, CompileResult};
pub use predicate::*;
