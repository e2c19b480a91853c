//! The inventory store facade.

use inv_core::{ChangeEvent, Resource, ResourceId, ResourceInput, ResourceKind, RowId};
use inv_graph::Row;
use inv_hierarchy::TreeNode;
use inv_mutation::{DeleteOutcome, FieldMask, MutationError, MutationExecutor, UpdateOutcome};
use inv_query::{to_resource, FindPage, HydratedResource, ListPage, ListRequest, QueryExecutor};
use inv_registry::{inventory_registry, Registry};
use inv_transaction::{TransactionManager, WriteTxn};
use std::sync::Arc;
use tracing::debug;

use crate::{EventSink, NoopSink, RequestContext, StoreConfig, StoreError, StoreResult};

/// How a delete request was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The resource no longer exists.
    Removed,
    /// The resource is marked for deletion and awaits reconciliation.
    Pending,
    /// A delete was already pending. Nothing changed and no event was
    /// published. Deleting a resource that is gone answers NotFound instead.
    AlreadyPending,
}

/// Multi-tenant inventory store.
///
/// Every write runs in one read-write transaction: a failure at any step
/// leaves no trace. Events are published after the transaction commits,
/// before the next writer starts, so sinks see them in commit order.
pub struct InventoryStore {
    registry: Registry,
    manager: TransactionManager,
    config: StoreConfig,
    sink: Arc<dyn EventSink>,
}

impl InventoryStore {
    pub fn new(registry: Registry, config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            manager: TransactionManager::new(),
            config,
            sink: Arc::new(NoopSink),
        })
    }

    /// A store over the built-in inventory schema.
    pub fn with_inventory_schema(config: StoreConfig) -> StoreResult<Self> {
        Self::new(inventory_registry()?, config)
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ==================== Writes ====================

    /// Create a resource and return it hydrated.
    pub fn create(&self, ctx: &RequestContext, input: &ResourceInput) -> StoreResult<HydratedResource> {
        self.write(ctx, "create", |txn| {
            let row = self.mutation(txn).create(ctx.tenant, input)?;
            self.hydrate_row(ctx, txn, row)
        })
    }

    /// Apply the masked paths of `input` to `id`.
    ///
    /// An update that completes a two-phase delete returns the final image of
    /// the removed resource.
    pub fn update(
        &self,
        ctx: &RequestContext,
        id: &ResourceId,
        mask: &FieldMask,
        input: &ResourceInput,
    ) -> StoreResult<HydratedResource> {
        self.write(ctx, "update", |txn| {
            match self.mutation(txn).update(ctx.tenant, id, mask, input)? {
                UpdateOutcome::Updated(row) => self.hydrate_row(ctx, txn, row),
                UpdateOutcome::Removed(row) => Ok(self.detached(&row)),
            }
        })
    }

    pub fn delete(&self, ctx: &RequestContext, id: &ResourceId) -> StoreResult<DeleteStatus> {
        let outcome = self.write(ctx, "delete", |txn| {
            Ok(self.mutation(txn).delete(ctx.tenant, id)?)
        })?;
        Ok(match outcome {
            DeleteOutcome::Removed(_) => DeleteStatus::Removed,
            DeleteOutcome::SoftDeleted(_) => DeleteStatus::Pending,
            DeleteOutcome::AlreadyPending(_) => DeleteStatus::AlreadyPending,
        })
    }

    /// Delete every `kind` resource of the tenant.
    ///
    /// With `enforce` the rows are removed outright; otherwise each is
    /// marked for deletion. Returns the affected resources.
    pub fn delete_all_resources(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        enforce: bool,
    ) -> StoreResult<Vec<(ResourceKind, Resource)>> {
        self.write(ctx, "delete_all_resources", |txn| {
            let rows = self.mutation(txn).delete_all(ctx.tenant, kind, enforce)?;
            Ok(rows
                .iter()
                .map(|row| (row.kind(), to_resource(&self.registry, row)))
                .collect())
        })
    }

    // ==================== Reads ====================

    pub fn get(&self, ctx: &RequestContext, id: &ResourceId) -> StoreResult<HydratedResource> {
        self.read(ctx, "get", |query| Ok(query.get(ctx.tenant, id)?))
    }

    pub fn list(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        request: &ListRequest,
    ) -> StoreResult<ListPage> {
        self.read(ctx, "list", |query| Ok(query.list(ctx.tenant, kind, request)?))
    }

    pub fn find(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        request: &ListRequest,
    ) -> StoreResult<FindPage> {
        self.read(ctx, "find", |query| Ok(query.find(ctx.tenant, kind, request)?))
    }

    /// Telemetry profiles applying to `target` directly or through its
    /// physical ancestors.
    pub fn list_inherited_telemetry_profiles(
        &self,
        ctx: &RequestContext,
        target: &ResourceId,
        request: &ListRequest,
    ) -> StoreResult<ListPage> {
        self.read(ctx, "list_inherited_telemetry_profiles", |query| {
            Ok(query.list_inherited_telemetry_profiles(ctx.tenant, target, request)?)
        })
    }

    pub fn get_tree_hierarchy(&self, ctx: &RequestContext, ids: &[ResourceId]) -> StoreResult<Vec<TreeNode>> {
        self.read(ctx, "get_tree_hierarchy", |query| Ok(query.tree_hierarchy(ctx.tenant, ids)?))
    }

    // ==================== Helpers ====================

    fn mutation<'a, 'g>(&'a self, txn: &'a mut WriteTxn<'g>) -> MutationExecutor<'a, 'g> {
        MutationExecutor::new(&self.registry, txn).with_config(self.config.mutation())
    }

    fn hydrate_row(
        &self,
        ctx: &RequestContext,
        txn: &WriteTxn<'_>,
        row: RowId,
    ) -> StoreResult<HydratedResource> {
        let graph = txn.graph();
        let id = graph
            .get_row(row)
            .map(|r| r.resource_id.clone())
            .ok_or_else(|| MutationError::missing_row(row))?;
        let query = QueryExecutor::new(&self.registry, graph).with_config(self.config.query());
        Ok(query.get(ctx.tenant, &id)?)
    }

    /// A result for a row that is no longer stored.
    fn detached(&self, row: &Row) -> HydratedResource {
        HydratedResource {
            resource: to_resource(&self.registry, row),
            rendered_metadata: Default::default(),
            linked: Default::default(),
        }
    }

    fn write<T, F>(&self, ctx: &RequestContext, op: &'static str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> StoreResult<T>,
    {
        let deadline = ctx.deadline(self.config.default_deadline());
        let (value, ()) = self
            .manager
            .write_then(deadline, f, |events| self.publish(events))
            .inspect_err(|err| rejected(ctx, op, err))?;
        Ok(value)
    }

    fn read<T, F>(&self, ctx: &RequestContext, op: &'static str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&QueryExecutor<'_, '_>) -> StoreResult<T>,
    {
        let deadline = ctx.deadline(self.config.default_deadline());
        self.manager
            .read(deadline, |txn| {
                let query = QueryExecutor::new(&self.registry, txn.graph()).with_config(self.config.query());
                f(&query)
            })
            .inspect_err(|err| rejected(ctx, op, err))
    }

    fn publish(&self, events: Vec<ChangeEvent>) {
        for event in events {
            self.sink.publish(event);
        }
    }
}

fn rejected(ctx: &RequestContext, op: &str, err: &StoreError) {
    debug!(tenant = %ctx.tenant, op, code = ?err.code(), error = %err, "request rejected");
}
