//! Upstream AI Provider Module
//!
//! Defines the core UpstreamProvider trait and error types, the closed set of
//! supported models, plus sub-modules for the registry and concrete provider
//! implementations (Gemini, OpenAI).

pub mod gemini;
pub mod openai;
pub mod registry;

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

// Re-exports for convenience.
pub use self::gemini::GeminiProvider;
pub use self::openai::OpenAiProvider;
pub use self::registry::ProviderRegistry;

// ---------------------------------------------------------------------------
// ModelKind
// ---------------------------------------------------------------------------

/// The closed set of models this service proxies.
///
/// Parsed from the request's `model` field. Anything outside this set is a
/// client input error, rejected before any storage or network access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Gemini,
    OpenAi,
}

impl ModelKind {
    /// Canonical wire name, also used as the storage key for counters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }

    /// All supported models, in wire-name order.
    pub fn all() -> [ModelKind; 2] {
        [Self::Gemini, Self::OpenAi]
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            _ => Err(format!("Unknown model: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

// ---------------------------------------------------------------------------
// Dispatch result + token estimation
// ---------------------------------------------------------------------------

/// Outcome of a successful upstream dispatch.
///
/// `body` is the provider's response JSON, returned to the caller verbatim.
/// `estimated_tokens` is what the accounting step charges for the request.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub body: serde_json::Value,
    pub estimated_tokens: u64,
}

/// Estimate the token cost of a prompt: one token per 4 characters, rounded
/// up. A deliberate approximation applied uniformly across providers, so
/// quota math stays comparable between models.
pub fn estimate_tokens(prompt: &str) -> u64 {
    (prompt.chars().count() as u64).div_ceil(4)
}

// ---------------------------------------------------------------------------
// UpstreamProvider trait
// ---------------------------------------------------------------------------

/// Trait that all upstream providers must implement.
///
/// Async methods return boxed futures so the trait is dyn-compatible (can be
/// used as `Arc<dyn UpstreamProvider>`). No `async_trait` macro is needed.
pub trait UpstreamProvider: Send + Sync {
    /// Unique identifier for this provider (e.g. "gemini", "openai").
    fn id(&self) -> &str;

    /// Send a prompt upstream and return the raw response JSON together with
    /// the token estimate to charge.
    ///
    /// The response body passes through regardless of the upstream HTTP
    /// status; a provider-level error payload is still a completed dispatch.
    /// Only transport failures and non-JSON bodies are errors.
    fn generate(
        &self,
        prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Dispatch, ProviderError>> + Send + '_>>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_from_str() {
        assert_eq!("gemini".parse::<ModelKind>().unwrap(), ModelKind::Gemini);
        assert_eq!("openai".parse::<ModelKind>().unwrap(), ModelKind::OpenAi);
        assert!("claude".parse::<ModelKind>().is_err());
        assert!("".parse::<ModelKind>().is_err());
        // Case-sensitive on purpose: the wire contract is lowercase.
        assert!("Gemini".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_model_kind_display_round_trip() {
        for kind in ModelKind::all() {
            assert_eq!(kind.to_string().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::InvalidBody("not json".into());
        assert_eq!(err.to_string(), "Invalid response body: not json");
    }

    #[test]
    fn test_estimate_tokens_ceiling() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"x".repeat(24)), 6);
        assert_eq!(estimate_tokens(&"x".repeat(10_000)), 2_500);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // Four codepoints, twelve bytes.
        assert_eq!(estimate_tokens("日本語字"), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn estimate_is_monotone_in_length(prompt in ".{0,256}") {
            let longer = format!("{prompt}abcd");
            prop_assert!(estimate_tokens(&longer) >= estimate_tokens(&prompt));
        }

        #[test]
        fn estimate_brackets_char_count(prompt in ".{1,256}") {
            let chars = prompt.chars().count() as u64;
            let estimate = estimate_tokens(&prompt);
            prop_assert!(estimate * 4 >= chars);
            prop_assert!((estimate - 1) * 4 < chars);
        }
    }
}
