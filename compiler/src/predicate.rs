//! Bound predicate tree.
//!
//! Every name is resolved and every literal is in stored form, so evaluation
//! never consults the registry.

use inv_core::{ResourceKind, Value};

pub use inv_parser::CompareOp;

/// One traversal hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Follow a forward edge of the current row.
    Forward { edge: String, target: ResourceKind },
    /// Follow a back-reference: rows of `source` whose `edge` links the current row.
    Backward { source: ResourceKind, edge: String },
}

impl Step {
    /// Kind of the rows this step reaches.
    pub fn reaches(&self) -> ResourceKind {
        match self {
            Step::Forward { target, .. } => *target,
            Step::Backward { source, .. } => *source,
        }
    }
}

/// What a comparison reads on the row at the end of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    ResourceId,
    TenantId,
    Field(String),
    /// Forward edge compared by target id (or null for unlinked).
    Edge(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// True if any row reached through `steps` satisfies `column op value`.
    Compare {
        steps: Vec<Step>,
        column: Column,
        op: CompareOp,
        value: Value,
    },
    /// True if `steps` reaches at least one row.
    Exists { steps: Vec<Step> },
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Predicate {
        Predicate::And(Box::new(left), Box::new(right))
    }

    /// Equality on a column of the row itself.
    pub fn column_eq(column: Column, value: Value) -> Predicate {
        Predicate::Compare {
            steps: Vec::new(),
            column,
            op: CompareOp::Eq,
            value,
        }
    }
}

/// A filter bound to one kind. `None` matches every row.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub kind: ResourceKind,
    pub predicate: Option<Predicate>,
}

impl CompiledFilter {
    pub fn match_all(kind: ResourceKind) -> Self {
        Self {
            kind,
            predicate: None,
        }
    }
}

/// Column an `order_by` term sorts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortColumn {
    ResourceId,
    CreatedAt,
    UpdatedAt,
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: SortColumn,
    pub descending: bool,
}
