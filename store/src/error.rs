//! Store error types.

use inv_core::Code;
use inv_mutation::MutationError;
use inv_query::QueryError;
use inv_registry::RegistryError;
use inv_transaction::TransactionError;
use thiserror::Error;

use crate::ConfigError;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("schema error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    pub fn code(&self) -> Code {
        match self {
            StoreError::Mutation(e) => e.code(),
            StoreError::Query(e) => e.code(),
            StoreError::Transaction(e) => e.code(),
            StoreError::Registry(_) => Code::Internal,
            StoreError::Config(_) => Code::InvalidArgument,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
