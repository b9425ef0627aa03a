pub mod guard;
pub mod store;

pub use self::guard::{QuotaDecision, QuotaGuard};
pub use self::store::{DEFAULT_MONTHLY_LIMIT, UsageSnapshot, UsageStore};
