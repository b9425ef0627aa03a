use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;
use crate::providers::ModelKind;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub user_id: String,
    pub model: String,
    pub tokens_used: u64,
    pub monthly_limit: u64,
    pub remaining: u64,
}

/// GET /api/usage?userId=...&model=...
///
/// Read-only snapshot of one (user, model) counter against its limit. A pair
/// that has never been charged reports zero usage without creating a row.
pub async fn usage_report(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageResponse>, AppError> {
    let (user_id, model_name) = match (query.user_id.as_deref(), query.model.as_deref()) {
        (Some(user_id), Some(model)) if !user_id.is_empty() && !model.is_empty() => {
            (user_id, model)
        }
        _ => return Err(AppError::MissingParams),
    };

    let model: ModelKind = model_name.parse().map_err(|_| AppError::UnknownModel)?;

    let snapshot = state.usage.snapshot(user_id, model.as_str())?;
    Ok(Json(UsageResponse {
        remaining: snapshot.remaining(),
        user_id: snapshot.user_id,
        model: snapshot.model,
        tokens_used: snapshot.tokens_used,
        monthly_limit: snapshot.monthly_limit,
    }))
}
