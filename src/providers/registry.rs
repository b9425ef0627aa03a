//! Model-to-provider dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProvidersConfig;
use crate::net::HttpClient;
use crate::providers::{GeminiProvider, ModelKind, OpenAiProvider, UpstreamProvider};

/// Maps each supported model to its provider adapter.
///
/// Adding a provider means writing a new adapter and registering it here;
/// the proxy handler stays untouched.
pub struct ProviderRegistry {
    providers: HashMap<ModelKind, Arc<dyn UpstreamProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Build a registry with both built-in adapters, sharing one HTTP client.
    pub fn from_config(http: &HttpClient, config: &ProvidersConfig) -> Self {
        let mut registry = Self::new();
        registry.register(
            ModelKind::Gemini,
            Arc::new(GeminiProvider::new(http.clone(), config.gemini.clone())),
        );
        registry.register(
            ModelKind::OpenAi,
            Arc::new(OpenAiProvider::new(http.clone(), config.openai.clone())),
        );
        registry
    }

    /// Register (or replace) the adapter for a model.
    pub fn register(&mut self, kind: ModelKind, provider: Arc<dyn UpstreamProvider>) {
        self.providers.insert(kind, provider);
    }

    pub fn get(&self, kind: ModelKind) -> Option<Arc<dyn UpstreamProvider>> {
        self.providers.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_registers_all_models() {
        let registry = ProviderRegistry::from_config(&HttpClient::new(), &ProvidersConfig::default());
        assert_eq!(registry.len(), 2);
        for kind in ModelKind::all() {
            let provider = registry.get(kind).unwrap();
            assert_eq!(provider.id(), kind.as_str());
        }
    }

    #[test]
    fn test_empty_registry_returns_none() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(ModelKind::Gemini).is_none());
    }
}
