//! Mutation error types.

use inv_core::messages::{
    ERR_EMPTY_FIELD_MASK, ERR_FULL_REPLACE, ERR_KIND_MISMATCH, ERR_RESOURCE_ID_ON_CREATE,
    ERR_TENANT_MISMATCH, ERR_TENANT_UPDATE,
};
use inv_core::{Code, GraphError, IdError, MetadataError, ResourceKind, RowId};
use inv_hierarchy::HierarchyError;
use inv_transaction::TransactionError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during mutation execution.
#[derive(Debug, Error)]
pub enum MutationError {
    // ========== InvalidArgument ==========
    #[error("{}", ERR_RESOURCE_ID_ON_CREATE)]
    ResourceIdOnCreate,

    #[error("{}", ERR_TENANT_MISMATCH)]
    TenantMismatch,

    #[error("{}", ERR_KIND_MISMATCH)]
    KindMismatch,

    #[error("{}", ERR_EMPTY_FIELD_MASK)]
    EmptyFieldMask,

    #[error("{}", ERR_FULL_REPLACE)]
    FullReplace,

    #[error("{}", ERR_TENANT_UPDATE)]
    TenantUpdate,

    #[error("field mask path {path:?} is immutable")]
    ImmutablePath { path: String },

    #[error("unknown field or edge {name:?} on {kind}")]
    UnknownField { kind: ResourceKind, name: String },

    #[error("missing required {name:?} on {kind}")]
    MissingRequired { kind: ResourceKind, name: String },

    #[error("invalid value for {field}: expected {expected}, got {actual}")]
    InvalidValue {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field} value {value} is out of range {range_desc}")]
    RangeViolation {
        field: String,
        value: i64,
        range_desc: String,
    },

    #[error("{field} exceeds maximum length {max}")]
    TooLong { field: String, max: usize },

    #[error("{field} value {value:?} does not match the required format")]
    PatternMismatch { field: String, value: String },

    #[error("{field}: unknown enum member {member:?}")]
    UnknownEnumMember { field: String, member: String },

    #[error("no enum table for field {field:?} on {kind}")]
    MissingEnumMap { kind: ResourceKind, field: String },

    #[error("invalid metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("{0}")]
    InvalidId(#[from] IdError),

    #[error("edge {edge:?} holds at most one target, got {count}")]
    Cardinality { edge: String, count: usize },

    #[error("one-of group {group:?} may link at most one target")]
    OneofConflict { group: String },

    #[error("{kind} validation failed: {message}")]
    Validation { kind: ResourceKind, message: String },

    #[error("{0} has no desired state to soft delete")]
    SoftDeleteUnsupported(ResourceKind),

    // ========== NotFound ==========
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },

    #[error("edge {edge:?} target {target} not found")]
    EdgeTargetNotFound { edge: String, target: String },

    // ========== FailedPrecondition ==========
    #[error("cannot remove {id}: still referenced through {relation} by {source_id}")]
    Restricted {
        id: String,
        relation: String,
        source_id: String,
    },

    #[error("{field} value {value} already in use")]
    UniqueConflict { field: String, value: String },

    #[error("{target} is already linked through exclusive edge {edge:?}")]
    ExclusiveConflict { edge: String, target: String },

    // ========== Internal ==========
    #[error("kind {0} is not registered")]
    UnknownKind(ResourceKind),

    #[error("could not allocate a free {0} id")]
    IdExhausted(ResourceKind),

    #[error("bulk delete of {kind} affected {actual} rows, scanned {expected}")]
    CountMismatch {
        kind: ResourceKind,
        expected: usize,
        actual: usize,
    },

    #[error("invalid pattern for {field}: {message}")]
    InvalidPattern { field: String, message: String },

    // ========== Wrapped ==========
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl MutationError {
    pub fn unknown_field(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::UnknownField {
            kind,
            name: name.into(),
        }
    }

    pub fn missing_required(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::MissingRequired {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn immutable_path(path: impl Into<String>) -> Self {
        Self::ImmutablePath { path: path.into() }
    }

    pub fn validation(kind: ResourceKind, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn edge_target_not_found(edge: impl Into<String>, target: impl Into<String>) -> Self {
        Self::EdgeTargetNotFound {
            edge: edge.into(),
            target: target.into(),
        }
    }

    pub fn restricted(id: impl ToString, relation: impl Into<String>, source_id: impl ToString) -> Self {
        Self::Restricted {
            id: id.to_string(),
            relation: relation.into(),
            source_id: source_id.to_string(),
        }
    }

    /// A row vanished between lookup and use inside one transaction.
    pub fn missing_row(id: RowId) -> Self {
        Self::Transaction(TransactionError::Graph(GraphError::RowNotFound(id)))
    }

    pub fn code(&self) -> Code {
        match self {
            MutationError::NotFound { .. } | MutationError::EdgeTargetNotFound { .. } => {
                Code::NotFound
            }
            MutationError::Restricted { .. }
            | MutationError::UniqueConflict { .. }
            | MutationError::ExclusiveConflict { .. } => Code::FailedPrecondition,
            MutationError::UnknownKind(_)
            | MutationError::IdExhausted(_)
            | MutationError::CountMismatch { .. }
            | MutationError::InvalidPattern { .. } => Code::Internal,
            MutationError::Hierarchy(e) => e.code(),
            MutationError::Transaction(e) => e.code(),
            _ => Code::InvalidArgument,
        }
    }
}
