//! Error types for notelm-llm

use crate::registry::ProviderId;
use thiserror::Error;

/// LLM routing error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider has no credential configured
    #[error("provider not configured: {provider} ({config_key} not set)")]
    ProviderUnavailable {
        /// Which provider was requested
        provider: ProviderId,
        /// Environment key that would configure it
        config_key: &'static str,
    },

    /// API returned a non-success status
    #[error("api error: {0}")]
    Api(String),

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}s")]
    Timeout(u64),

    /// Request rejected before dispatch
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// The unavailable condition for a provider, naming its credential key
    #[must_use]
    pub fn unavailable(provider: ProviderId) -> Self {
        Self::ProviderUnavailable {
            provider,
            config_key: provider.config_key(),
        }
    }

    /// True for errors that surface as an upstream request failure
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Api(_) | Self::InvalidResponse(_) | Self::Network(_) | Self::Timeout(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_provider_and_key() {
        let err = Error::unavailable(ProviderId::OpenRouter);
        let message = err.to_string();
        assert!(message.contains("openrouter"));
        assert!(message.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_request_failure_classification() {
        assert!(Error::Api("boom".into()).is_request_failure());
        assert!(Error::Network("refused".into()).is_request_failure());
        assert!(Error::Timeout(60).is_request_failure());
        assert!(Error::InvalidResponse("bad json".into()).is_request_failure());
        assert!(!Error::unavailable(ProviderId::Google).is_request_failure());
        assert!(!Error::InvalidRequest("empty".into()).is_request_failure());
    }
}
