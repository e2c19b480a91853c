//! Predicate evaluation over stored rows.
//!
//! A path step may reach many rows (a back-reference, a many edge). A
//! comparison holds when any reached row satisfies it. Traversal never
//! leaves the starting row's tenant.

use inv_compiler::{Column, CompareOp, Predicate, Step};
use inv_core::Value;
use inv_graph::{Graph, Row};
use std::cmp::Ordering;

/// Evaluates bound predicates against one graph.
pub struct PredicateEvaluator<'g> {
    graph: &'g Graph,
}

impl<'g> PredicateEvaluator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn matches(&self, row: &Row, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Compare {
                steps,
                column,
                op,
                value,
            } => self
                .reach(row, steps)
                .into_iter()
                .any(|reached| compare(&read_column(reached, column), *op, value)),
            Predicate::Exists { steps } => !self.reach(row, steps).is_empty(),
            Predicate::Not(inner) => !self.matches(row, inner),
            Predicate::And(left, right) => self.matches(row, left) && self.matches(row, right),
            Predicate::Or(left, right) => self.matches(row, left) || self.matches(row, right),
        }
    }

    /// Rows reached from `start` by following `steps` in order.
    fn reach<'a>(&'a self, start: &'a Row, steps: &[Step]) -> Vec<&'a Row> {
        let mut frontier = vec![start];
        for step in steps {
            let mut next: Vec<&Row> = Vec::new();
            for row in frontier {
                for reached in self.follow(row, step) {
                    if reached.tenant_id == start.tenant_id && !next.iter().any(|r| r.id == reached.id) {
                        next.push(reached);
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }
        frontier
    }

    fn follow(&self, row: &Row, step: &Step) -> Vec<&'g Row> {
        match step {
            Step::Forward { edge, .. } => row
                .links
                .get(edge)
                .into_iter()
                .flatten()
                .filter_map(|id| self.graph.get_by_resource_id(id))
                .collect(),
            Step::Backward { source, edge } => self
                .graph
                .sources(&row.resource_id, edge)
                .into_iter()
                .filter_map(|id| self.graph.get_row(id))
                .filter(|r| r.kind() == *source)
                .collect(),
        }
    }
}

fn read_column(row: &Row, column: &Column) -> Value {
    match column {
        Column::ResourceId => Value::String(row.resource_id.to_string()),
        Column::TenantId => Value::String(row.tenant_id.to_string()),
        Column::Field(name) => row.get(name).cloned().unwrap_or(Value::Null),
        Column::Edge(name) => row
            .link(name)
            .map(|id| Value::String(id.to_string()))
            .unwrap_or(Value::Null),
    }
}

fn compare(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => equals(actual, expected),
        CompareOp::NotEq => !equals(actual, expected),
        CompareOp::Lt => ordering(actual, expected) == Some(Ordering::Less),
        CompareOp::LtEq => matches!(ordering(actual, expected), Some(Ordering::Less | Ordering::Equal)),
        CompareOp::Gt => ordering(actual, expected) == Some(Ordering::Greater),
        CompareOp::GtEq => matches!(ordering(actual, expected), Some(Ordering::Greater | Ordering::Equal)),
    }
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (a, Value::Null) => a.is_null(),
        // Enum literals and stored enums may arrive as either variant.
        (Value::Enum(a) | Value::String(a), Value::Enum(b) | Value::String(b)) => a == b,
        (a, b) => a == b,
    }
}

/// Ordering comparisons only apply to two integers.
fn ordering(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
