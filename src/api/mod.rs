pub mod health;
pub mod proxy;
pub mod usage;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

/// Build the full API router with all endpoint groups.
///
/// Route layout:
/// ```text
/// /health          GET   liveness probe
/// /api/ai-proxy    POST  quota-gated proxy to the upstream providers
/// /api/usage       GET   read-only usage snapshot for one (user, model)
/// ```
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/ai-proxy", post(proxy::ai_proxy))
        .route("/api/usage", get(usage::usage_report))
}
