use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health
///
/// Liveness probe. Always returns `{"status":"ok"}` while the process is up.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_response_shape() {
        let response = health_check().await;
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }
}
