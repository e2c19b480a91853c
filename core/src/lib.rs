//! Inventory Core Types
//!
//! This crate provides the foundational types used throughout the inventory store:
//! - Identity types (RowId, ResourceId, TenantId, ResourceKind)
//! - Value types (the Value enum used for resource fields)
//! - Metadata pairs and their format rules
//! - Resource envelopes (stored resources and client payloads)
//! - Change events emitted on commit
//! - The error code taxonomy shared by every layer

mod error;
mod event;
mod id;
mod lifecycle;
mod metadata;
pub mod messages;
mod resource;
mod value;

pub use error::*;
pub use event::*;
pub use id::*;
pub use lifecycle::*;
pub use metadata::*;
pub use resource::*;
pub use value::*;

/// Timestamp type used for server-set creation and update times.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current server time.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
