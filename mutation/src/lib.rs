//! Inventory Mutation
//!
//! Execute write operations (create, field-mask update, delete, bulk delete).
//!
//! Responsibilities:
//! - Validate payloads against the kind descriptor
//! - Resolve edge references inside the caller's tenant
//! - Apply only the paths a field mask names
//! - Decide soft versus hard removal and guard referential integrity
//! - Queue one change event per committed transition
//!
//! # Module Structure
//!
//! - `executor` - Main MutationExecutor that coordinates operations
//! - `ops/` - Individual operation implementations (create, update, delete, bulk)
//! - `validation` - Field value checks, defaults, uniqueness, kind validators
//! - `edges` - Edge target resolution, one-of groups, exclusivity
//! - `mask` - Field mask shape checks and path resolution
//! - `error` - Error types for mutation failures
//! - `result` - Result types for mutation outcomes

mod edges;
mod error;
mod executor;
mod mask;
mod ops;
mod result;
mod validation;

pub use error::{MutationError, MutationResult};
pub use executor::{MutationConfig, MutationExecutor, DEFAULT_ID_GENERATION_ATTEMPTS};
pub use mask::FieldMask;
pub use result::{DeleteOutcome, UpdateOutcome};
