//! Caller-supplied time budget.

use crate::{TransactionError, TransactionResult};
use std::time::{Duration, Instant};

/// Point in time after which a transaction must abort.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// Expires `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(budget),
        }
    }

    /// Never expires.
    pub fn none() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
    }

    /// Time left, or `None` without a budget.
    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .map(|budget| budget.saturating_sub(self.started.elapsed()))
    }

    pub fn check(&self) -> TransactionResult<()> {
        if self.is_expired() {
            return Err(self.exceeded());
        }
        Ok(())
    }

    pub(crate) fn exceeded(&self) -> TransactionError {
        TransactionError::deadline_exceeded(self.started.elapsed(), self.budget.unwrap_or_default())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
