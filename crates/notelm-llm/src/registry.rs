//! Provider registry
//!
//! The catalog of supported providers is static. Whether each one is
//! *available* is derived from configuration at startup: a provider with an
//! empty credential is still listed so clients can render it as disabled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::providers::{gemini, openrouter};
use crate::settings::LlmSettings;

/// Closed set of supported chat providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Google Gemini, called directly
    Google,
    /// OpenRouter multi-provider gateway
    OpenRouter,
}

impl ProviderId {
    /// All provider ids, in catalog order
    pub const ALL: [ProviderId; 2] = [ProviderId::Google, ProviderId::OpenRouter];

    /// Stable string form used in requests and responses
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Environment key holding the provider credential
    #[must_use]
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Google => "GOOGLE_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Parse a provider id
    ///
    /// Accepts "gemini" as an alias for google. Returns `None` for
    /// unrecognized values; callers decide whether that falls back to the
    /// default provider.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "gemini" => Some(Self::Google),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry describing one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInfo {
    /// Provider id
    pub id: ProviderId,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// True when the credential is configured
    pub available: bool,
    /// Static model ids, display order
    pub models: Vec<String>,
}

/// Static provider catalog with configuration-derived availability
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    google_available: bool,
    openrouter_available: bool,
    default_provider: ProviderId,
    openrouter_default_model: String,
}

impl ProviderRegistry {
    /// Build the registry from settings. Pure data assembly, no I/O.
    #[must_use]
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            google_available: settings.is_configured(ProviderId::Google),
            openrouter_available: settings.is_configured(ProviderId::OpenRouter),
            default_provider: settings.default_provider_id(),
            openrouter_default_model: settings.openrouter_default_model.clone(),
        }
    }

    /// List both providers, always, in catalog order
    #[must_use]
    pub fn list(&self) -> Vec<ProviderInfo> {
        vec![
            ProviderInfo {
                id: ProviderId::Google,
                name: "Google Gemini",
                description: "Gemini models called directly on the Google AI API",
                available: self.google_available,
                models: gemini::MODELS.iter().map(|m| (*m).to_string()).collect(),
            },
            ProviderInfo {
                id: ProviderId::OpenRouter,
                name: "OpenRouter",
                description: "Access to 100+ LLM providers via unified API",
                available: self.openrouter_available,
                models: openrouter::MODELS.iter().map(|m| (*m).to_string()).collect(),
            },
        ]
    }

    /// Availability flag for one provider
    #[must_use]
    pub fn is_available(&self, id: ProviderId) -> bool {
        match id {
            ProviderId::Google => self.google_available,
            ProviderId::OpenRouter => self.openrouter_available,
        }
    }

    /// Fail with the unavailable condition unless `id` is configured
    ///
    /// # Errors
    /// Returns [`Error::ProviderUnavailable`] naming the provider and its
    /// credential key.
    pub fn require_available(&self, id: ProviderId) -> Result<()> {
        if self.is_available(id) {
            Ok(())
        } else {
            Err(Error::unavailable(id))
        }
    }

    /// Provider used when a request does not name one
    #[must_use]
    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    /// Model used when a request on `id` does not name one
    #[must_use]
    pub fn default_model_for(&self, id: ProviderId) -> &str {
        match id {
            ProviderId::Google => gemini::DEFAULT_MODEL,
            ProviderId::OpenRouter => &self.openrouter_default_model,
        }
    }

    /// Default (provider, model) pair
    #[must_use]
    pub fn default_selection(&self) -> (ProviderId, &str) {
        (
            self.default_provider,
            self.default_model_for(self.default_provider),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(google: &str, openrouter: &str) -> LlmSettings {
        LlmSettings::default()
            .with_google_key(google)
            .with_openrouter_key(openrouter)
    }

    #[test]
    fn test_parse_accepts_aliases() {
        assert_eq!(ProviderId::parse("google"), Some(ProviderId::Google));
        assert_eq!(ProviderId::parse("gemini"), Some(ProviderId::Google));
        assert_eq!(ProviderId::parse("OpenRouter"), Some(ProviderId::OpenRouter));
        assert_eq!(ProviderId::parse(" openrouter "), Some(ProviderId::OpenRouter));
        assert_eq!(ProviderId::parse("azure"), None);
        assert_eq!(ProviderId::parse(""), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&ProviderId::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");
        let back: ProviderId = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(back, ProviderId::Google);
    }

    #[test]
    fn test_list_always_returns_both() {
        let registry = ProviderRegistry::new(&settings("", ""));
        let providers = registry.list();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].id, ProviderId::Google);
        assert_eq!(providers[1].id, ProviderId::OpenRouter);
        assert!(!providers[0].available);
        assert!(!providers[1].available);
        assert!(!providers[0].models.is_empty());
        assert!(!providers[1].models.is_empty());
    }

    #[test]
    fn test_availability_tracks_credentials() {
        let registry = ProviderRegistry::new(&settings("google-test-key-123", ""));
        assert!(registry.is_available(ProviderId::Google));
        assert!(!registry.is_available(ProviderId::OpenRouter));

        let providers = registry.list();
        assert!(providers[0].available);
        assert!(!providers[1].available);
    }

    #[test]
    fn test_require_available_names_config_key() {
        let registry = ProviderRegistry::new(&settings("google-test-key-123", ""));
        assert!(registry.require_available(ProviderId::Google).is_ok());

        let err = registry.require_available(ProviderId::OpenRouter).unwrap_err();
        match err {
            Error::ProviderUnavailable { provider, config_key } => {
                assert_eq!(provider, ProviderId::OpenRouter);
                assert_eq!(config_key, "OPENROUTER_API_KEY");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_models_per_provider() {
        let settings = settings("k", "k").with_openrouter_model("openai/gpt-4-turbo");
        let registry = ProviderRegistry::new(&settings);
        assert_eq!(registry.default_model_for(ProviderId::Google), "gemini-2.0-flash");
        assert_eq!(
            registry.default_model_for(ProviderId::OpenRouter),
            "openai/gpt-4-turbo"
        );
    }

    #[test]
    fn test_default_selection() {
        let settings = settings("k", "k").with_default_provider("openrouter");
        let registry = ProviderRegistry::new(&settings);
        let (provider, model) = registry.default_selection();
        assert_eq!(provider, ProviderId::OpenRouter);
        assert_eq!(model, "anthropic/claude-3.5-sonnet");
    }
}
