//! Unbound filter syntax tree.
//!
//! Names in the tree are plain strings; nothing here knows about resource
//! kinds. The compiler binds the tree against a schema.

use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end, self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Dotted path: zero or more edge hops followed by a field or edge name.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<String>,
    pub span: Span,
}

impl Path {
    /// Number of edge hops before the final segment.
    pub fn hops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// Bare identifier, used for enum members.
    Ident(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LiteralKind::Null => write!(f, "null"),
            LiteralKind::Bool(b) => write!(f, "{}", b),
            LiteralKind::Int(i) => write!(f, "{}", i),
            LiteralKind::String(s) => write!(f, "{:?}", s),
            LiteralKind::Ident(s) => write!(f, "{}", s),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }

    /// Whether the operator needs an ordered operand.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            CompareOp::Lt | CompareOp::LtEq | CompareOp::Gt | CompareOp::GtEq
        )
    }
}

/// Filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `path op literal`
    Compare {
        path: Path,
        op: CompareOp,
        value: Literal,
    },
    /// `has(path)`: the final segment is an edge with at least one target.
    Has(Path),
    Not(Box<Filter>, Span),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn span(&self) -> Span {
        match self {
            Filter::Compare { path, value, .. } => path.span.to(value.span),
            Filter::Has(path) => path.span,
            Filter::Not(_, span) => *span,
            Filter::And(left, right) | Filter::Or(left, right) => left.span().to(right.span()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Compare { path, op, value } => {
                write!(f, "{} {} {}", path, op.symbol(), value)
            }
            Filter::Has(path) => write!(f, "has({})", path),
            Filter::Not(inner, _) => write!(f, "NOT ({})", inner),
            Filter::And(l, r) => write!(f, "({} AND {})", l, r),
            Filter::Or(l, r) => write!(f, "({} OR {})", l, r),
        }
    }
}

/// One `order_by` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub field: String,
    pub descending: bool,
    pub span: Span,
}
