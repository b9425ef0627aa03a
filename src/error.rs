use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::providers::ProviderError;

/// Unified application error type.
///
/// Every variant maps to a structured `{"error": "..."}` JSON body; the
/// client-facing strings for the proxy rejections are part of the wire
/// contract and must not change.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required request field (`userId`, `model`, `prompt`) is absent or empty.
    #[error("Missing params")]
    MissingParams,

    /// The requested model is outside the supported set.
    #[error("Unknown model")]
    UnknownModel,

    /// Usage for the (user, model) pair has reached its monthly limit.
    #[error("Free quota exceeded")]
    QuotaExceeded,

    /// The upstream provider call failed at the transport level. The detail
    /// stays in the logs; clients get a generic message.
    #[error("Upstream request failed")]
    Upstream(#[source] ProviderError),

    #[error("Database error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParams | Self::UnknownModel => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        tracing::error!(error = %err, "Database error");
        Self::Store(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        tracing::error!(error = %err, "Upstream provider error");
        Self::Upstream(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
