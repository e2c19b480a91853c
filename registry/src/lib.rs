//! Inventory Schema Registry
//!
//! Per-kind descriptors of fields, edges, enum maps, hierarchy shape,
//! metadata lineage, delete policy and validators. The registry is built once
//! through [`RegistryBuilder`] and is immutable afterwards.

mod builder;
mod inventory;
mod registry;
mod types;

pub use builder::*;
pub use inventory::*;
pub use registry::*;
pub use types::*;
