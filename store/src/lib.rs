//! Inventory Store
//!
//! The public facade over the inventory engine.
//!
//! Responsibilities:
//! - Run every request in one read-write or read-only transaction
//! - Scope every request to the caller's tenant
//! - Deliver change events after commit
//! - Load limits from configuration
//!
//! # Module Structure
//!
//! - `config` - `StoreConfig` and TOML loading
//! - `context` - per-request tenant and deadline
//! - `error` - `StoreError`
//! - `events` - `EventSink` and its implementations
//! - `store` - `InventoryStore`

mod config;
mod context;
mod error;
mod events;
mod store;

pub use config::{ConfigError, StoreConfig};
pub use context::RequestContext;
pub use error::{StoreError, StoreResult};
pub use events::{ChannelSink, EventSink, NoopSink, RecordingSink};
pub use store::{DeleteStatus, InventoryStore};

pub use inv_mutation::FieldMask;
pub use inv_query::{FindPage, HydratedResource, ListPage, ListRequest, ResourceRef};
pub use inv_hierarchy::{RenderedMetadata, TreeNode};
