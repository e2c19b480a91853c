//! Shared store fixture and resource builders.

use inv_core::{ChangeEvent, Metadata, ResourceId, ResourceInput, ResourceKind, TenantId};
use inv_store::{HydratedResource, InventoryStore, RecordingSink, RequestContext, StoreConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// A store over the default schema, its recorded events, and two tenants.
pub struct Fixture {
    pub store: InventoryStore,
    pub sink: Arc<RecordingSink>,
    pub t1: RequestContext,
    pub t2: RequestContext,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        init_tracing();
        let sink = Arc::new(RecordingSink::new());
        let store = InventoryStore::with_inventory_schema(config)
            .unwrap_or_else(|e| panic!("store setup failed: {e}"))
            .with_sink(sink.clone());
        Self {
            store,
            sink,
            t1: RequestContext::new(TenantId::random()),
            t2: RequestContext::new(TenantId::random()),
        }
    }

    /// Events published since the last call.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.sink.take()
    }

    /// Create `input`, panicking on rejection.
    #[track_caller]
    pub fn create(&self, ctx: &RequestContext, input: ResourceInput) -> HydratedResource {
        match self.store.create(ctx, &input) {
            Ok(created) => created,
            Err(e) => panic!("create {} failed: {e}", input.kind),
        }
    }

    #[track_caller]
    pub fn create_id(&self, ctx: &RequestContext, input: ResourceInput) -> ResourceId {
        self.create(ctx, input).resource.resource_id
    }

    // ==================== Builders ====================

    pub fn region_input(ctx: &RequestContext, name: &str, parent: Option<&ResourceId>) -> ResourceInput {
        let input = ResourceInput::new(ResourceKind::Region, ctx.tenant).field("name", name);
        match parent {
            Some(parent) => input.edge("parent", parent),
            None => input,
        }
    }

    #[track_caller]
    pub fn region(&self, ctx: &RequestContext, name: &str, parent: Option<&ResourceId>) -> ResourceId {
        self.create_id(ctx, Self::region_input(ctx, name, parent))
    }

    #[track_caller]
    pub fn region_with_metadata(
        &self,
        ctx: &RequestContext,
        parent: Option<&ResourceId>,
        pairs: &[(&str, &str)],
    ) -> ResourceId {
        let metadata = Metadata::from_pairs(pairs.iter().copied())
            .unwrap_or_else(|e| panic!("bad metadata: {e}"));
        self.create_id(ctx, Self::region_input(ctx, "r", parent).metadata(metadata))
    }

    /// A parent chain of `len` regions, root first.
    #[track_caller]
    pub fn region_chain(&self, ctx: &RequestContext, len: usize) -> Vec<ResourceId> {
        let mut chain: Vec<ResourceId> = Vec::with_capacity(len);
        for i in 0..len {
            let id = self.region(ctx, &format!("level-{i}"), chain.last());
            chain.push(id);
        }
        chain
    }

    #[track_caller]
    pub fn ou(&self, ctx: &RequestContext, parent: Option<&ResourceId>) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::OrganizationalUnit, ctx.tenant).field("name", "ou");
        let input = match parent {
            Some(parent) => input.edge("parent", parent),
            None => input,
        };
        self.create_id(ctx, input)
    }

    #[track_caller]
    pub fn site(&self, ctx: &RequestContext, region: Option<&ResourceId>) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::Site, ctx.tenant).field("name", "site");
        let input = match region {
            Some(region) => input.edge("region", region),
            None => input,
        };
        self.create_id(ctx, input)
    }

    #[track_caller]
    pub fn host(&self, ctx: &RequestContext, site: Option<&ResourceId>) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::Host, ctx.tenant).field("name", "host");
        let input = match site {
            Some(site) => input.edge("site", site),
            None => input,
        };
        self.create_id(ctx, input)
    }

    #[track_caller]
    pub fn vm(&self, ctx: &RequestContext, host: Option<&ResourceId>) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::Instance, ctx.tenant)
            .enum_field("kind", "INSTANCE_KIND_VM")
            .field("vm_cpu_cores", 4)
            .field("vm_memory_bytes", 8_i64 << 30);
        let input = match host {
            Some(host) => input.edge("host", host),
            None => input,
        };
        self.create_id(ctx, input)
    }

    #[track_caller]
    pub fn telemetry_group(&self, ctx: &RequestContext) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::TelemetryGroup, ctx.tenant)
            .field("name", "metrics")
            .enum_field("kind", "TELEMETRY_RESOURCE_KIND_METRICS");
        self.create_id(ctx, input)
    }

    /// A metrics profile of `group` attached through `edge` to `target`.
    #[track_caller]
    pub fn metrics_profile(
        &self,
        ctx: &RequestContext,
        group: &ResourceId,
        edge: &str,
        target: &ResourceId,
        interval: i64,
    ) -> ResourceId {
        let input = ResourceInput::new(ResourceKind::TelemetryProfile, ctx.tenant)
            .enum_field("kind", "TELEMETRY_RESOURCE_KIND_METRICS")
            .field("metrics_interval", interval)
            .edge("group", group)
            .edge(edge, target);
        self.create_id(ctx, input)
    }
}
