//! Transaction error types.

use inv_core::{Code, GraphError};
use std::time::Duration;
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The caller's deadline passed before the transaction finished.
    #[error("deadline exceeded after {elapsed:?} (budget {budget:?})")]
    DeadlineExceeded { elapsed: Duration, budget: Duration },

    /// Storage error during transaction.
    #[error("storage error: {0}")]
    Graph(#[from] GraphError),
}

impl TransactionError {
    pub fn deadline_exceeded(elapsed: Duration, budget: Duration) -> Self {
        Self::DeadlineExceeded { elapsed, budget }
    }

    pub fn code(&self) -> Code {
        match self {
            TransactionError::DeadlineExceeded { .. } => Code::DeadlineExceeded,
            TransactionError::Graph(e) => e.code(),
        }
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
