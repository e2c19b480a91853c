//! Query error types.

use inv_compiler::CompileError;
use inv_core::{Code, ResourceKind};
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur during query execution.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },

    #[error("{kind} cannot be a telemetry target")]
    InvalidTelemetryTarget { kind: ResourceKind },

    #[error("kind {0} is not registered")]
    UnknownKind(ResourceKind),
}

impl QueryError {
    pub fn not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            QueryError::Compile(e) => e.code(),
            QueryError::NotFound { .. } => Code::NotFound,
            QueryError::InvalidTelemetryTarget { .. } => Code::InvalidArgument,
            QueryError::UnknownKind(_) => Code::Internal,
        }
    }
}
