//! Inventory Graph Storage
//!
//! This crate provides the arena that holds every stored resource row:
//! - Row storage addressed by opaque `RowId`
//! - Resource-id index: find a row by its external id
//! - Scope index: find rows by tenant and kind
//! - Attribute index: find rows by exact field value
//! - Link index: find rows linking to a resource

mod graph;
mod index;
mod row;

pub use graph::*;
pub use row::*;
