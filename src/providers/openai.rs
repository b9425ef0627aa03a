//! OpenAI chat completions adapter.

use std::future::Future;
use std::pin::Pin;

use crate::config::OpenAiConfig;
use crate::net::HttpClient;
use crate::providers::{Dispatch, ProviderError, UpstreamProvider, estimate_tokens};

/// Adapter for the OpenAI chat completions API, bearer-token authenticated.
pub struct OpenAiProvider {
    http: HttpClient,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    pub fn new(http: HttpClient, config: OpenAiConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }
}

impl UpstreamProvider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn generate(
        &self,
        prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Dispatch, ProviderError>> + Send + '_>> {
        let url = self.endpoint();
        let body = self.request_body(prompt);
        let estimated_tokens = estimate_tokens(prompt);

        Box::pin(async move {
            tracing::debug!(model = %self.config.model, "Dispatching to OpenAI");

            let response = self
                .http
                .inner()
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidBody(e.to_string()))?;

            tracing::debug!(status = %status, "OpenAI response received");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_base(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            HttpClient::new(),
            OpenAiConfig {
                api_key: "sk-test".to_string(),
                base_url: base_url.to_string(),
                model: "gpt-3.5-turbo".to_string(),
            },
        )
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(provider_with_base("http://x").id(), "openai");
    }

    #[test]
    fn test_endpoint_format() {
        let provider = provider_with_base("https://api.openai.com");
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = provider_with_base("http://127.0.0.1:9999/");
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9999/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider_with_base("http://x");
        let body = provider.request_body("Summarize this");
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Summarize this");
    }
}
