//! Gemini generateContent adapter.

use std::future::Future;
use std::pin::Pin;

use crate::config::GeminiConfig;
use crate::net::HttpClient;
use crate::providers::{Dispatch, ProviderError, UpstreamProvider, estimate_tokens};

/// Adapter for the Google Generative Language API.
///
/// The API key travels in the URL query string, which is how this API
/// authenticates; it must never appear in logs.
pub struct GeminiProvider {
    http: HttpClient,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(http: HttpClient, config: GeminiConfig) -> Self {
        Self { http, config }
    }

    /// Full generateContent URL for the configured upstream model.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        })
    }
}

impl UpstreamProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn generate(
        &self,
        prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Dispatch, ProviderError>> + Send + '_>> {
        let url = self.endpoint();
        let body = Self::request_body(prompt);
        let estimated_tokens = estimate_tokens(prompt);

        Box::pin(async move {
            tracing::debug!(model = %self.config.model, "Dispatching to Gemini");

            let response = self
                .http
                .inner()
                .post(&url)
                .query(&[("key", self.config.api_key.as_str())])
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidBody(e.to_string()))?;

            tracing::debug!(status = %status, "Gemini response received");
            Ok(Dispatch {
                body,
                estimated_tokens,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
