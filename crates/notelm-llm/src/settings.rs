//! Runtime settings for provider routing
//!
//! Built once at startup and handed to [`crate::router::ChatRouter`] by
//! reference. A missing credential is represented as an empty string and is
//! never fatal; requests for that provider fail at resolution time instead.

use std::fmt;

use crate::registry::ProviderId;
use crate::util::mask_api_key;

/// Provider id used when none is configured
pub const DEFAULT_PROVIDER: &str = "google";

/// Application name sent in OpenRouter attribution headers
pub const DEFAULT_APP_NAME: &str = "NoteLM";

/// Site URL sent in OpenRouter attribution headers
pub const DEFAULT_SITE_URL: &str = "https://notelm.app";

/// Model used for OpenRouter requests that do not name one
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Provider routing settings
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    /// Google AI API key; empty means not configured
    pub google_api_key: String,
    /// OpenRouter API key; empty means not configured
    pub openrouter_api_key: String,
    /// Default provider id, "google" or "openrouter"
    pub default_provider: String,
    /// Model for OpenRouter requests that do not name one
    pub openrouter_default_model: String,
    /// Optional upstream routing hint forwarded to OpenRouter
    pub openrouter_provider: Option<String>,
    /// Application name for attribution headers
    pub app_name: String,
    /// Site URL for attribution headers
    pub site_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            openrouter_api_key: String::new(),
            default_provider: DEFAULT_PROVIDER.to_string(),
            openrouter_default_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            openrouter_provider: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl LlmSettings {
    /// Load settings from environment variables
    ///
    /// Reads `GOOGLE_API_KEY`, `OPENROUTER_API_KEY`, `DEFAULT_LLM_PROVIDER`,
    /// `OPENROUTER_MODEL` and `OPENROUTER_PROVIDER`. Absent variables keep
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            google_api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            default_provider: std::env::var("DEFAULT_LLM_PROVIDER")
                .unwrap_or(defaults.default_provider),
            openrouter_default_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or(defaults.openrouter_default_model),
            openrouter_provider: std::env::var("OPENROUTER_PROVIDER").ok(),
            app_name: std::env::var("APP_NAME").unwrap_or(defaults.app_name),
            site_url: std::env::var("SITE_URL").unwrap_or(defaults.site_url),
        }
    }

    /// Set the Google API key
    #[must_use]
    pub fn with_google_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = key.into();
        self
    }

    /// Set the OpenRouter API key
    #[must_use]
    pub fn with_openrouter_key(mut self, key: impl Into<String>) -> Self {
        self.openrouter_api_key = key.into();
        self
    }

    /// Set the default provider id
    #[must_use]
    pub fn with_default_provider(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = provider.into();
        self
    }

    /// Set the OpenRouter default model
    #[must_use]
    pub fn with_openrouter_model(mut self, model: impl Into<String>) -> Self {
        self.openrouter_default_model = model.into();
        self
    }

    /// Set the OpenRouter upstream routing hint
    #[must_use]
    pub fn with_openrouter_provider(mut self, provider: impl Into<String>) -> Self {
        self.openrouter_provider = Some(provider.into());
        self
    }

    /// Set the application name used in attribution headers
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the site URL used in attribution headers
    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// True when the credential for `provider` is set
    #[must_use]
    pub fn is_configured(&self, provider: ProviderId) -> bool {
        match provider {
            ProviderId::Google => !self.google_api_key.is_empty(),
            ProviderId::OpenRouter => !self.openrouter_api_key.is_empty(),
        }
    }

    /// Parsed default provider; unrecognized values fall back to google
    #[must_use]
    pub fn default_provider_id(&self) -> ProviderId {
        ProviderId::parse(&self.default_provider).unwrap_or(ProviderId::Google)
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("google_api_key", &mask_api_key(&self.google_api_key))
            .field("openrouter_api_key", &mask_api_key(&self.openrouter_api_key))
            .field("default_provider", &self.default_provider)
            .field("openrouter_default_model", &self.openrouter_default_model)
            .field("openrouter_provider", &self.openrouter_provider)
            .field("app_name", &self.app_name)
            .field("site_url", &self.site_url)
            .finish()
    }
}
