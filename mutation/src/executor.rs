//! Mutation executor - coordinates mutation operations.
//!
//! The executor delegates to specialized operation modules in `ops/`:
//! - `ops/create.rs` - create (validated constructor, server-assigned id)
//! - `ops/update.rs` - field-mask partial update
//! - `ops/delete.rs` - soft/hard delete with referential integrity
//! - `ops/bulk.rs` - delete every resource of one kind in a tenant

use inv_core::{ResourceId, ResourceInput, ResourceKind, RowId, TenantId};
use inv_graph::Row;
use inv_hierarchy::DEFAULT_MAX_HIERARCHY_DEPTH;
use inv_registry::Registry;
use inv_transaction::WriteTxn;

use crate::error::MutationResult;
use crate::mask::FieldMask;
use crate::ops;
use crate::result::{DeleteOutcome, UpdateOutcome};

/// Default number of random ids drawn before giving up on a free one.
pub const DEFAULT_ID_GENERATION_ATTEMPTS: usize = 8;

/// Limits applied by mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationConfig {
    pub max_hierarchy_depth: usize,
    pub id_generation_attempts: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            id_generation_attempts: DEFAULT_ID_GENERATION_ATTEMPTS,
        }
    }
}

/// Mutation executor bound to one open transaction.
pub struct MutationExecutor<'a, 'g> {
    registry: &'a Registry,
    txn: &'a mut WriteTxn<'g>,
    config: MutationConfig,
}

impl<'a, 'g> MutationExecutor<'a, 'g> {
    /// Create a new executor.
    pub fn new(registry: &'a Registry, txn: &'a mut WriteTxn<'g>) -> Self {
        Self {
            registry,
            txn,
            config: MutationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MutationConfig) -> Self {
        self.config = config;
        self
    }

    /// Create a resource owned by `tenant`.
    pub fn create(&mut self, tenant: TenantId, input: &ResourceInput) -> MutationResult<RowId> {
        ops::execute_create(self.registry, self.txn, &self.config, tenant, input)
    }

    /// Apply the paths of `mask` from `input` to `id`.
    pub fn update(
        &mut self,
        tenant: TenantId,
        id: &ResourceId,
        mask: &FieldMask,
        input: &ResourceInput,
    ) -> MutationResult<UpdateOutcome> {
        ops::execute_update(self.registry, self.txn, &self.config, tenant, id, mask, input)
    }

    /// Delete `id` according to its kind's delete policy.
    pub fn delete(&mut self, tenant: TenantId, id: &ResourceId) -> MutationResult<DeleteOutcome> {
        ops::execute_delete(self.registry, self.txn, tenant, id)
    }

    /// Delete every `kind` resource of `tenant`, hard when `enforce`.
    pub fn delete_all(
        &mut self,
        tenant: TenantId,
        kind: ResourceKind,
        enforce: bool,
    ) -> MutationResult<Vec<Row>> {
        ops::execute_delete_all(self.registry, self.txn, tenant, kind, enforce)
    }
}
