//! Common error types for the inventory store.

use crate::{ResourceId, RowId};
use std::fmt;
use thiserror::Error;

/// Status code attached to every error surfaced by the store.
///
/// Calling layers classify failures by code, and by the identifiable
/// substrings kept in messages (for example "depth" for hierarchy violations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Malformed filter, mask or id; validation failure; depth or cycle violation.
    InvalidArgument,
    /// Unknown id, cross-tenant access, dangling or cross-tenant edge reference.
    NotFound,
    /// Referential-integrity block or uniqueness conflict.
    FailedPrecondition,
    /// Schema or invariant inconsistency. Should be unreachable.
    Internal,
    /// The caller's deadline expired before the transaction finished.
    DeadlineExceeded,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::NotFound => "NOT_FOUND",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Internal => "INTERNAL",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing resource and tenant identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid resource id {id:?}: expected <prefix>-<8 lowercase hex>")]
    Malformed { id: String },

    #[error("invalid resource id {id:?}: unknown prefix {prefix:?}")]
    UnknownPrefix { id: String, prefix: String },

    #[error("invalid resource id {id:?}: expected prefix {expected:?}")]
    PrefixMismatch { id: String, expected: String },

    #[error("invalid tenant id {id:?}: {reason}")]
    InvalidTenant { id: String, reason: String },
}

impl IdError {
    pub fn code(&self) -> Code {
        Code::InvalidArgument
    }
}

/// Errors that can occur during graph storage operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Row not found.
    #[error("Row not found: {0}")]
    RowNotFound(RowId),

    /// Resource id already present in the store.
    #[error("Resource id already in use: {0}")]
    DuplicateResourceId(ResourceId),

    /// Cannot remove a row because other rows still link to it.
    #[error("Cannot remove {resource_id}: still referenced through {edge}")]
    StillReferenced { resource_id: ResourceId, edge: String },
}

impl GraphError {
    pub fn code(&self) -> Code {
        match self {
            GraphError::RowNotFound(_) => Code::NotFound,
            GraphError::DuplicateResourceId(_) => Code::Internal,
            GraphError::StillReferenced { .. } => Code::FailedPrecondition,
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
