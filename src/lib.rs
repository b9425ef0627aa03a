pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod net;
pub mod providers;
pub mod usage;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::net::HttpClient;
use crate::providers::{ModelKind, ProviderRegistry};
use crate::usage::{QuotaGuard, UsageStore};

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub usage: Arc<UsageStore>,
    pub quota: Arc<QuotaGuard>,
    pub providers: Arc<ProviderRegistry>,
}

impl AppState {
    /// Wire the full application state from a loaded config and open database.
    pub fn build(config: Config, db: Database) -> Self {
        let http = HttpClient::from_config(&config.upstream);
        let usage = Arc::new(UsageStore::new(db));
        let quota = Arc::new(QuotaGuard::new(usage.clone()));
        let providers = Arc::new(ProviderRegistry::from_config(&http, &config.providers));

        Self {
            config: Arc::new(config),
            usage,
            quota,
            providers,
        }
    }

    /// Upsert the configured monthly limits into the store. Called once at
    /// startup, before the server accepts traffic.
    pub fn seed_limits(&self) -> Result<(), AppError> {
        use std::str::FromStr;

        for (model, limit) in &self.config.quota.limits {
            if ModelKind::from_str(model).is_err() {
                tracing::warn!(model = %model, "Configured limit for an unsupported model");
            }
            self.usage.set_limit(model, *limit)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Router assembly
// ---------------------------------------------------------------------------

/// Build the application router with all middleware layers.
pub fn build_app(state: AppState) -> Router {
    let config = &state.config;

    // -- CORS layer -----------------------------------------------------------
    let cors = build_cors_layer(config);

    // -- Request ID layer (X-Request-ID) --------------------------------------
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // -- Tracing layer --------------------------------------------------------
    let trace = TraceLayer::new_for_http();

    Router::new()
        .merge(api::build_api_router())
        // Global middleware stack (applied to all routes)
        .layer(propagate_id)
        .layer(request_id)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from config.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.server.cors_origins.is_empty() {
        // Empty origin list means allow any origin.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
