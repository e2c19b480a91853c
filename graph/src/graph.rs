//! Core row storage implementation.

use crate::index::{AttributeIndex, LinkIndex, ScopeIndex};
use crate::Row;
use inv_core::{
    Attributes, EdgeMap, GraphError, GraphResult, ResourceId, ResourceKind, RowId, TenantId,
    Timestamp, Value,
};
use std::collections::HashMap;

/// ID allocator for rows.
#[derive(Debug, Clone)]
struct IdAllocator {
    next_row_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_row_id: 1 }
    }

    fn alloc_row_id(&mut self) -> RowId {
        let id = RowId::new(self.next_row_id);
        self.next_row_id += 1;
        id
    }
}

/// The in-memory resource arena.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Row storage
    rows: HashMap<RowId, Row>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// External id index
    by_resource_id: HashMap<ResourceId, RowId>,
    /// Tenant and kind index
    scope_index: ScopeIndex,
    /// Field value index
    attr_index: AttributeIndex,
    /// Reverse link index
    link_index: LinkIndex,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            id_alloc: IdAllocator::new(),
            by_resource_id: HashMap::new(),
            scope_index: ScopeIndex::new(),
            attr_index: AttributeIndex::new(),
            link_index: LinkIndex::new(),
        }
    }

    // ==================== Row Operations ====================

    /// Store a new row. Link targets are not checked here.
    pub fn create_row(
        &mut self,
        resource_id: ResourceId,
        tenant_id: TenantId,
        fields: Attributes,
        links: EdgeMap,
        now: Timestamp,
    ) -> GraphResult<RowId> {
        if self.by_resource_id.contains_key(&resource_id) {
            return Err(GraphError::DuplicateResourceId(resource_id));
        }

        let id = self.id_alloc.alloc_row_id();
        let row = Row {
            id,
            resource_id,
            tenant_id,
            fields,
            links,
            created_at: now,
            updated_at: now,
        };
        self.index_row(&row);
        self.rows.insert(id, row);
        Ok(id)
    }

    /// Get a row by ID.
    pub fn get_row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Resolve an external id to its row.
    pub fn lookup(&self, resource_id: &ResourceId) -> Option<RowId> {
        self.by_resource_id.get(resource_id).copied()
    }

    /// Get a row by external id.
    pub fn get_by_resource_id(&self, resource_id: &ResourceId) -> Option<&Row> {
        self.lookup(resource_id).and_then(|id| self.rows.get(&id))
    }

    /// Set a field on a row, returning the previous value.
    pub fn set_field(&mut self, id: RowId, name: &str, value: Value) -> GraphResult<Option<Value>> {
        let row = self.rows.get_mut(&id).ok_or(GraphError::RowNotFound(id))?;
        let (tenant, kind) = (row.tenant_id, row.kind());

        let old = if value.is_null() {
            row.fields.remove(name)
        } else {
            row.fields.insert(name.to_string(), value.clone())
        };

        if let Some(old_value) = &old {
            self.attr_index.remove(tenant, kind, name, old_value, id);
        }
        self.attr_index.insert(tenant, kind, name, &value, id);
        Ok(old)
    }

    /// Replace the targets of an edge, returning the previous targets.
    pub fn set_links(
        &mut self,
        id: RowId,
        edge: &str,
        targets: Vec<ResourceId>,
    ) -> GraphResult<Vec<ResourceId>> {
        let row = self.rows.get_mut(&id).ok_or(GraphError::RowNotFound(id))?;

        let old = if targets.is_empty() {
            row.links.remove(edge).unwrap_or_default()
        } else {
            row.links.insert(edge.to_string(), targets.clone()).unwrap_or_default()
        };

        for target in &old {
            self.link_index.remove(target, edge, id);
        }
        for target in &targets {
            self.link_index.insert(target, edge, id);
        }
        Ok(old)
    }

    /// Stamp the update time of a row.
    pub fn touch(&mut self, id: RowId, now: Timestamp) -> GraphResult<()> {
        let row = self.rows.get_mut(&id).ok_or(GraphError::RowNotFound(id))?;
        row.updated_at = now;
        Ok(())
    }

    /// Remove a row that nothing links to.
    pub fn remove(&mut self, id: RowId) -> GraphResult<Row> {
        let row = self.rows.get(&id).ok_or(GraphError::RowNotFound(id))?;

        if let Some((edge, source)) = self.link_index.links_to(&row.resource_id).next() {
            let from = self
                .rows
                .get(&source)
                .map(|r| r.kind().name())
                .unwrap_or("unknown");
            return Err(GraphError::StillReferenced {
                resource_id: row.resource_id.clone(),
                edge: format!("{}.{}", from, edge),
            });
        }

        self.take(id).ok_or(GraphError::RowNotFound(id))
    }

    // ==================== Raw Restore ====================

    /// Remove a row without reference checks.
    ///
    /// Used when undoing a creation; links held by other rows are left as is.
    pub fn take(&mut self, id: RowId) -> Option<Row> {
        let row = self.rows.remove(&id)?;
        self.unindex_row(&row);
        Some(row)
    }

    /// Store a row image under its own id, replacing any current image.
    pub fn put(&mut self, row: Row) {
        if let Some(current) = self.rows.remove(&row.id) {
            self.unindex_row(&current);
        }
        self.index_row(&row);
        self.rows.insert(row.id, row);
    }

    fn index_row(&mut self, row: &Row) {
        let (tenant, kind) = (row.tenant_id, row.kind());
        self.by_resource_id.insert(row.resource_id.clone(), row.id);
        self.scope_index.insert(tenant, kind, row.id);
        for (name, value) in &row.fields {
            self.attr_index.insert(tenant, kind, name, value, row.id);
        }
        for (edge, target) in row.all_links() {
            self.link_index.insert(target, edge, row.id);
        }
    }

    fn unindex_row(&mut self, row: &Row) {
        let (tenant, kind) = (row.tenant_id, row.kind());
        self.by_resource_id.remove(&row.resource_id);
        self.scope_index.remove(tenant, kind, row.id);
        for (name, value) in &row.fields {
            self.attr_index.remove(tenant, kind, name, value, row.id);
        }
        for (edge, target) in row.all_links() {
            self.link_index.remove(target, edge, row.id);
        }
    }

    // ==================== Query Operations ====================

    /// Rows of one kind owned by one tenant, in allocation order.
    pub fn rows_in_scope(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
    ) -> impl Iterator<Item = RowId> + '_ {
        self.scope_index.get(tenant, kind)
    }

    pub fn count_in_scope(&self, tenant: TenantId, kind: ResourceKind) -> usize {
        self.scope_index.count(tenant, kind)
    }

    /// Rows in scope whose field equals `value` exactly.
    pub fn rows_by_field(
        &self,
        tenant: TenantId,
        kind: ResourceKind,
        field: &str,
        value: &Value,
    ) -> impl Iterator<Item = RowId> + '_ {
        self.attr_index.find_exact(tenant, kind, field, value)
    }

    /// Rows linking to `target`, as (edge name, source row).
    pub fn links_to(&self, target: &ResourceId) -> impl Iterator<Item = (&str, RowId)> + '_ {
        self.link_index.links_to(target)
    }

    /// Source rows linking to `target` through `edge`.
    pub fn sources(&self, target: &ResourceId, edge: &str) -> Vec<RowId> {
        self.link_index
            .links_to(target)
            .filter(|(e, _)| *e == edge)
            .map(|(_, row)| row)
            .collect()
    }

    // ==================== Statistics ====================

    /// Get the number of rows in the graph.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all row IDs.
    pub fn all_row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.keys().copied()
    }
}
