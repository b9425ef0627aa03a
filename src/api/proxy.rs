use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::providers::ModelKind;
use crate::usage::QuotaDecision;

/// POST /api/ai-proxy request body.
///
/// All three fields are required on the wire; they are optional here so that
/// absence surfaces as the contract's 400 body instead of a framework
/// rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ProxyRequest {
    /// All three fields, present and non-empty.
    fn require_fields(&self) -> Result<(&str, &str, &str), AppError> {
        match (
            self.user_id.as_deref(),
            self.model.as_deref(),
            self.prompt.as_deref(),
        ) {
            (Some(user_id), Some(model), Some(prompt))
                if !user_id.is_empty() && !model.is_empty() && !prompt.is_empty() =>
            {
                Ok((user_id, model, prompt))
            }
            _ => Err(AppError::MissingParams),
        }
    }
}

/// An unparseable or absent body is treated the same as an empty one, so the
/// response stays on the documented wire contract.
fn parse_request(body: &[u8]) -> ProxyRequest {
    serde_json::from_slice(body).unwrap_or_default()
}

/// POST /api/ai-proxy
///
/// Quota-gated pass-through to the upstream provider for the requested
/// model. Per request: validate fields, resolve the model, check the quota,
/// dispatch upstream, record the token charge, and return the provider's
/// JSON body verbatim.
///
/// The charge is recorded after every completed dispatch, including ones
/// whose pass-through body is a provider-level error payload. A transport
/// failure aborts before accounting and surfaces as 502.
pub async fn ai_proxy(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let request_id = Uuid::new_v4().to_string();
    let request = parse_request(&body);
    let (user_id, model_name, prompt) = request.require_fields()?;

    // Closed-set membership first: unknown models never reach storage.
    let model: ModelKind = model_name.parse().map_err(|_| AppError::UnknownModel)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        model = %model,
        "Proxy request"
    );
    if state.config.logging.log_content {
        tracing::debug!(prompt = %prompt, "Prompt content");
    }

    match state.quota.check(user_id, model.as_str())? {
        QuotaDecision::Denied { .. } => return Err(AppError::QuotaExceeded),
        QuotaDecision::Allowed { used, limit } => {
            tracing::debug!(used = used, limit = limit, "Quota check passed");
        }
    }

    let provider = state
        .providers
        .get(model)
        .ok_or_else(|| AppError::Internal(format!("No provider registered for {model}")))?;

    let dispatch = provider.generate(prompt).await?;

    // Attempted spend: the tokens were sent upstream, so they count even if
    // the returned payload reports a provider-level failure.
    state
        .usage
        .record_usage(user_id, model.as_str(), dispatch.estimated_tokens)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        model = %model,
        tokens = dispatch.estimated_tokens,
        "Usage recorded"
    );

    Ok(Json(dispatch.body))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
