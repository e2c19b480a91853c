//! Inventory integration test support.
//!
//! Scenario suites under `tests/` build on a shared [`Fixture`]: a store over
//! the default schema, a recording event sink, and two tenants.

mod expect;
mod fixture;

pub use expect::{expect_err, ExpectEvents};
pub use fixture::{init_tracing, Fixture};

pub mod prelude {
    pub use crate::{expect_err, init_tracing, ExpectEvents, Fixture};
    pub use inv_core::{
        Code, EventKind, Metadata, ResourceId, ResourceInput, ResourceKind, TenantId, Value,
    };
    pub use inv_store::{
        DeleteStatus, FieldMask, InventoryStore, ListRequest, RequestContext, StoreConfig,
        StoreError,
    };
}
