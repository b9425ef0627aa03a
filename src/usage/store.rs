use rusqlite::params;

use crate::db::Database;
use crate::error::AppError;

/// Monthly token allowance for models without a configured limit row.
pub const DEFAULT_MONTHLY_LIMIT: u64 = 10_000;

/// Point-in-time view of one (user, model) counter against its limit.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub user_id: String,
    pub model: String,
    pub tokens_used: u64,
    pub monthly_limit: u64,
}

impl UsageSnapshot {
    pub fn remaining(&self) -> u64 {
        self.monthly_limit.saturating_sub(self.tokens_used)
    }
}

/// Tracks per-user, per-model token usage against the SQLite database.
///
/// All mutation goes through [`record_usage`](Self::record_usage), a single
/// upsert statement, so concurrent increments never lose updates.
pub struct UsageStore {
    db: Database,
}

impl UsageStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Current token count for a (user, model) pair. A pair that has never
    /// been recorded reads as 0 without creating a row.
    pub fn usage(&self, user_id: &str, model: &str) -> Result<u64, AppError> {
        let used = self.db.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT tokens_used FROM usage_counters WHERE user_id = ?1 AND model = ?2",
                params![user_id, model],
                |row| row.get::<_, u64>(0),
            );
            match result {
                Ok(n) => Ok(n),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
                Err(e) => Err(e),
            }
        })?;
        Ok(used)
    }

    /// Add tokens to a (user, model) counter, creating the row on first use.
    ///
    /// The add happens inside the statement itself; callers never read, add,
    /// and write back.
    pub fn record_usage(&self, user_id: &str, model: &str, tokens: u64) -> Result<(), AppError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO usage_counters (user_id, model, tokens_used) \
                 VALUES (?1, ?2, ?3) \
                 ON CONFLICT(user_id, model) DO UPDATE SET \
                   tokens_used = tokens_used + excluded.tokens_used, \
                   updated_at = datetime('now')",
                params![user_id, model, tokens],
            )?;
            Ok(())
        })?;
        Ok(())
    }

    /// Monthly limit for a model, falling back to [`DEFAULT_MONTHLY_LIMIT`]
    /// when no row is configured.
    pub fn limit(&self, model: &str) -> Result<u64, AppError> {
        let limit = self.db.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT monthly_limit FROM model_limits WHERE model = ?1",
                params![model],
                |row| row.get::<_, u64>(0),
            );
            match result {
                Ok(n) => Ok(n),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(DEFAULT_MONTHLY_LIMIT),
                Err(e) => Err(e),
            }
        })?;
        Ok(limit)
    }

    /// Upsert the monthly limit for a model.
    pub fn set_limit(&self, model: &str, limit: u64) -> Result<(), AppError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO model_limits (model, monthly_limit) VALUES (?1, ?2) \
                 ON CONFLICT(model) DO UPDATE SET monthly_limit = excluded.monthly_limit",
                params![model, limit],
            )?;
            Ok(())
        })?;

        tracing::info!(model = %model, limit = limit, "Monthly limit set");
        Ok(())
    }

    /// Usage and limit together, for the read-only usage endpoint.
    pub fn snapshot(&self, user_id: &str, model: &str) -> Result<UsageSnapshot, AppError> {
        Ok(UsageSnapshot {
            user_id: user_id.to_string(),
            model: model.to_string(),
            tokens_used: self.usage(user_id, model)?,
            monthly_limit: self.limit(model)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
