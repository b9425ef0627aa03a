use std::sync::Arc;

use crate::error::AppError;
use crate::usage::store::UsageStore;

/// Result of a quota check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotaDecision {
    /// Usage is below the limit; the request may proceed.
    Allowed { used: u64, limit: u64 },
    /// Usage has reached the limit; the request must be rejected.
    Denied { used: u64, limit: u64 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Pre-dispatch quota enforcement.
///
/// Reads the counter and the limit as two independent queries; the window
/// between a check and the later increment means concurrent requests can
/// slightly overshoot a limit. Counters themselves never lose updates.
/// A storage failure is an error, never an open gate.
pub struct QuotaGuard {
    store: Arc<UsageStore>,
}

impl QuotaGuard {
    pub fn new(store: Arc<UsageStore>) -> Self {
        Self { store }
    }

    /// Deny iff current usage has reached the model's monthly limit.
    pub fn check(&self, user_id: &str, model: &str) -> Result<QuotaDecision, AppError> {
        let used = self.store.usage(user_id, model)?;
        let limit = self.store.limit(model)?;

        if used >= limit {
            tracing::warn!(
                user_id = %user_id,
                model = %model,
                used = used,
                limit = limit,
                "Quota exceeded"
            );
            Ok(QuotaDecision::Denied { used, limit })
        } else {
            Ok(QuotaDecision::Allowed { used, limit })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
