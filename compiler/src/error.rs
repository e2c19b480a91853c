//! Compile error types.

use inv_core::{Code, ResourceKind};
use inv_parser::{ParseError, Span};
use thiserror::Error;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while binding a filter or order-by list.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid filter: {0}")]
    Parse(#[from] ParseError),

    #[error("kind {0} is not registered")]
    UnknownKind(ResourceKind),

    #[error("unknown field or edge {name:?} on {kind} at line {}, column {}", span.line, span.column)]
    UnknownName {
        kind: ResourceKind,
        name: String,
        span: Span,
    },

    #[error("filter path {path} exceeds maximum filter depth {max}")]
    TooDeep { path: String, max: usize },

    #[error("{name:?} on {kind} is not an edge and cannot be traversed")]
    NotAnEdge { kind: ResourceKind, name: String },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("{path}: unknown enum member {member:?}")]
    UnknownEnumMember { path: String, member: String },

    #[error("{path}: operator {op} is not supported here")]
    UnsupportedOperator { path: String, op: String },

    #[error("order_by field {0:?} is not sortable")]
    NotSortable(String),
}

impl CompileError {
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unsupported_operator(path: impl Into<String>, op: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            path: path.into(),
            op: op.into(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            CompileError::UnknownKind(_) => Code::Internal,
            _ => Code::InvalidArgument,
        }
    }
}
