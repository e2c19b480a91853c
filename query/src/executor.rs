//! Query execution.

use inv_compiler::{Column, CompiledFilter, FilterCompiler, Predicate, DEFAULT_MAX_FILTER_DEPTH};
use inv_core::{ResourceId, ResourceKind, TenantId, Value};
use inv_graph::{Graph, Row};
use inv_hierarchy::{ancestors, tree_hierarchy, TreeNode, DEFAULT_MAX_HIERARCHY_DEPTH};
use inv_registry::{Registry, RELATION_GROUP};
use std::collections::BTreeSet;
use tracing::debug;

use crate::eval::PredicateEvaluator;
use crate::hydrate::{HydratedResource, Hydrator};
use crate::page::{paginate, sort_rows, FindPage, ListPage, ListRequest, ResourceRef};
use crate::{QueryError, QueryResult};

/// Default number of link levels loaded into a result.
pub const DEFAULT_HYDRATION_DEPTH: usize = 2;

/// Kinds a telemetry profile may be listed for.
const TELEMETRY_TARGETS: [ResourceKind; 4] = [
    ResourceKind::Instance,
    ResourceKind::Host,
    ResourceKind::Site,
    ResourceKind::Region,
];

/// Limits applied by read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub max_filter_depth: usize,
    pub hydration_depth: usize,
    pub max_hierarchy_depth: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
            hydration_depth: DEFAULT_HYDRATION_DEPTH,
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
        }
    }
}

/// Query executor.
pub struct QueryExecutor<'r, 'g> {
    registry: &'r Registry,
    graph: &'g Graph,
    config: QueryConfig,
}

impl<'r, 'g> QueryExecutor<'r, 'g> {
    /// Create a new executor.
    pub fn new(registry: &'r Registry, graph: &'g Graph) -> Self {
        Self {
            registry,
            graph,
            config: QueryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch one resource with its rendered metadata.
    pub fn get(&self, tenant: TenantId, id: &ResourceId) -> QueryResult<HydratedResource> {
        let row = self.find_row(tenant, id)?;
        Ok(self.hydrator().hydrate(row))
    }

    /// Filtered, ordered, paginated resources of one kind.
    pub fn list(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
        request: &ListRequest,
    ) -> QueryResult<ListPage> {
        let rows = self.matching(tenant, kind, request)?;
        Ok(self.list_page(rows, request))
    }

    /// Like [`QueryExecutor::list`], returning only identities.
    pub fn find(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
        request: &ListRequest,
    ) -> QueryResult<FindPage> {
        let rows = self.matching(tenant, kind, request)?;
        let total = rows.len();
        let (window, has_next) = paginate(rows, request.offset, request.limit);
        Ok(FindPage {
            items: window
                .into_iter()
                .map(|row| ResourceRef {
                    resource_id: row.resource_id.clone(),
                    tenant_id: row.tenant_id,
                })
                .collect(),
            total,
            has_next,
        })
    }

    /// Telemetry profiles attached to `target` or to any physical ancestor
    /// of it, filtered and paginated like a List.
    pub fn list_inherited_telemetry_profiles(
        &self,
        tenant: TenantId,
        target: &ResourceId,
        request: &ListRequest,
    ) -> QueryResult<ListPage> {
        if !TELEMETRY_TARGETS.contains(&target.kind()) {
            return Err(QueryError::InvalidTelemetryTarget {
                kind: target.kind(),
            });
        }
        let start = self.find_row(tenant, target)?;
        let profile_kind = ResourceKind::TelemetryProfile;
        let def = self
            .registry
            .get_kind(profile_kind)
            .ok_or(QueryError::UnknownKind(profile_kind))?;

        let mut chain = vec![start];
        chain.extend(
            ancestors(self.registry, self.graph, start, self.config.max_hierarchy_depth)
                .into_iter()
                .filter(|row| row.tenant_id == tenant),
        );

        let mut attached: BTreeSet<_> = BTreeSet::new();
        for node in &chain {
            let edges = def
                .oneof_members(RELATION_GROUP)
                .into_iter()
                .filter(|edge| edge.target == node.kind());
            for edge in edges {
                attached.extend(self.graph.sources(&node.resource_id, &edge.name));
            }
        }

        let filter = self.compile(tenant, profile_kind, &request.filter)?;
        let evaluator = PredicateEvaluator::new(self.graph);
        let mut rows: Vec<&Row> = attached
            .into_iter()
            .filter_map(|id| self.graph.get_row(id))
            .filter(|row| row.kind() == profile_kind)
            .filter(|row| self.accepts(&evaluator, row, &filter))
            .collect();
        self.sort(profile_kind, &mut rows, &request.order_by)?;

        debug!(%tenant, target = %target, chain = chain.len(), profiles = rows.len(), "inherited telemetry profiles");
        Ok(self.list_page(rows, request))
    }

    /// Upward ancestry of the requested resources.
    pub fn tree_hierarchy(&self, tenant: TenantId, ids: &[ResourceId]) -> QueryResult<Vec<TreeNode>> {
        let roots = ids
            .iter()
            .map(|id| self.find_row(tenant, id).map(|row| row.id))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(tree_hierarchy(self.registry, self.graph, &roots))
    }

    // ==================== Helpers ====================

    fn find_row(&self, tenant: TenantId, id: &ResourceId) -> QueryResult<&'g Row> {
        self.graph
            .get_by_resource_id(id)
            .filter(|row| row.tenant_id == tenant)
            .ok_or_else(|| QueryError::not_found(id.kind(), id))
    }

    fn hydrator(&self) -> Hydrator<'r, 'g> {
        Hydrator::new(
            self.registry,
            self.graph,
            self.config.hydration_depth,
            self.config.max_hierarchy_depth,
        )
    }

    /// Compile `filter` and conjoin it with the tenant check.
    fn compile(&self, tenant: TenantId, kind: ResourceKind, filter: &str) -> QueryResult<CompiledFilter> {
        let mut compiled = FilterCompiler::new(self.registry)
            .with_max_depth(self.config.max_filter_depth)
            .compile(kind, filter)?;
        let tenant_check = Predicate::column_eq(Column::TenantId, Value::String(tenant.to_string()));
        compiled.predicate = Some(match compiled.predicate.take() {
            Some(predicate) => Predicate::and(tenant_check, predicate),
            None => tenant_check,
        });
        Ok(compiled)
    }

    fn accepts(&self, evaluator: &PredicateEvaluator<'_>, row: &Row, filter: &CompiledFilter) -> bool {
        filter
            .predicate
            .as_ref()
            .map_or(true, |predicate| evaluator.matches(row, predicate))
    }

    fn sort(&self, kind: ResourceKind, rows: &mut [&Row], order_by: &str) -> QueryResult<()> {
        if order_by.trim().is_empty() {
            return Ok(());
        }
        let keys = FilterCompiler::new(self.registry).compile_order_by(kind, order_by)?;
        sort_rows(rows, &keys);
        Ok(())
    }

    /// Rows of `kind` in `tenant` matching the request's filter, ordered.
    fn matching(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
        request: &ListRequest,
    ) -> QueryResult<Vec<&'g Row>> {
        let filter = self.compile(tenant, kind, &request.filter)?;
        let evaluator = PredicateEvaluator::new(self.graph);
        let mut rows: Vec<&'g Row> = self
            .graph
            .rows_in_scope(tenant, kind)
            .filter_map(|id| self.graph.get_row(id))
            .filter(|row| self.accepts(&evaluator, row, &filter))
            .collect();
        self.sort(kind, &mut rows, &request.order_by)?;
        Ok(rows)
    }

    fn list_page(&self, rows: Vec<&Row>, request: &ListRequest) -> ListPage {
        let total = rows.len();
        let (window, has_next) = paginate(rows, request.offset, request.limit);
        let hydrator = self.hydrator();
        ListPage {
            items: window.into_iter().map(|row| hydrator.hydrate(row)).collect(),
            total,
            has_next,
        }
    }
}
