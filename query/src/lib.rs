//! Inventory Query
//!
//! Execute read operations (Get, List, Find, inherited telemetry profiles,
//! tree hierarchy).
//!
//! Responsibilities:
//! - Compile filters and conjoin the tenant check
//! - Evaluate predicates with "any related row" path semantics
//! - Order by allow-listed columns and cut the offset/limit window
//! - Hydrate results with linked resources and rendered metadata
//!
//! # Module Structure
//!
//! - `executor` - Main QueryExecutor
//! - `eval` - Predicate evaluation over rows
//! - `page` - Requests, pages, sorting, pagination
//! - `hydrate` - Eager loading of linked resources
//! - `convert` - Stored rows to external resources

mod convert;
mod error;
mod eval;
mod executor;
mod hydrate;
mod page;

pub use convert::to_resource;
pub use error::{QueryError, QueryResult};
pub use eval::PredicateEvaluator;
pub use executor::{QueryConfig, QueryExecutor, DEFAULT_HYDRATION_DEPTH};
pub use hydrate::HydratedResource;
pub use page::{FindPage, ListPage, ListRequest, ResourceRef};
