//! Request and page shapes for List and Find, with ordering and pagination.

use inv_compiler::{SortColumn, SortKey};
use inv_core::{ResourceId, TenantId, Value};
use inv_graph::Row;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::HydratedResource;

/// Filter, order and window of a List or Find.
///
/// `limit == 0` applies no limit. An `offset` past the end yields an empty
/// page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub order_by: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A page of hydrated resources. `total` ignores pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub items: Vec<HydratedResource>,
    pub total: usize,
    pub has_next: bool,
}

/// Identity of a matching resource, as returned by Find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_id: ResourceId,
    pub tenant_id: TenantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindPage {
    pub items: Vec<ResourceRef>,
    pub total: usize,
    pub has_next: bool,
}

/// Stable sort by `keys`. An empty key list keeps the input order.
pub(crate) fn sort_rows(rows: &mut [&Row], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in keys {
            let cmp = compare_on(a, b, &key.column);
            if cmp != Ordering::Equal {
                return if key.descending { cmp.reverse() } else { cmp };
            }
        }
        Ordering::Equal
    });
}

fn compare_on(a: &Row, b: &Row, column: &SortColumn) -> Ordering {
    match column {
        SortColumn::ResourceId => a.resource_id.cmp(&b.resource_id),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortColumn::Field(name) => {
            let null = Value::Null;
            let left = a.get(name).unwrap_or(&null);
            let right = b.get(name).unwrap_or(&null);
            left.cmp_sortable(right)
        }
    }
}

/// Cut the `offset`/`limit` window out of `rows`.
///
/// Returns the window and whether rows remain after it.
pub(crate) fn paginate<T>(rows: Vec<T>, offset: usize, limit: usize) -> (Vec<T>, bool) {
    let total = rows.len();
    let start = offset.min(total);
    let end = if limit == 0 {
        total
    } else {
        start.saturating_add(limit).min(total)
    };
    let has_next = end < total;
    let window = rows.into_iter().skip(start).take(end - start).collect();
    (window, has_next)
}
