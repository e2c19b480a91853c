//! Per-request context.

use inv_core::TenantId;
use inv_transaction::Deadline;
use std::time::Duration;

/// The calling tenant and an optional time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant: TenantId,
    pub timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Deadline starting now, falling back to `default` without a timeout.
    pub(crate) fn deadline(&self, default: Duration) -> Deadline {
        Deadline::after(self.timeout.unwrap_or(default))
    }
}
