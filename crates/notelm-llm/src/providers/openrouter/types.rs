//! OpenRouter configuration and wire types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::ProviderId;
use crate::settings::{DEFAULT_APP_NAME, DEFAULT_SITE_URL};
use crate::util::mask_api_key;

/// OpenRouter API base URL
pub const BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Models offered in the static catalog
pub const MODELS: &[&str] = &[
    "anthropic/claude-3.5-sonnet",
    "anthropic/claude-3-opus",
    "openai/gpt-4",
    "openai/gpt-4-turbo",
    "google/gemini-2.0-flash",
    "google/gemini-2.5-flash",
    "google/gemini-2.5-pro",
    "meta/llama-3.1-70b",
    "zai/c3-7b",
    "zai/c3-13b",
    "zai/c3-40b",
];

/// Chat request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Model catalog request timeout
const MODELS_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a fetched model catalog stays fresh
pub(crate) const MODELS_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Context window reported when the catalog omits one
pub(crate) const DEFAULT_CONTEXT_LENGTH: u32 = 4096;

/// OpenRouter provider configuration
#[derive(Clone)]
pub struct OpenRouterConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Chat request timeout
    pub timeout: Duration,
    /// Model catalog request timeout
    pub models_timeout: Duration,
    /// Model catalog cache lifetime
    pub models_cache_ttl: Duration,
    /// Application name for the `X-Title` header
    pub app_name: String,
    /// Site URL for the `HTTP-Referer` header
    pub site_url: String,
    /// Upstream provider the gateway should try first
    pub provider_order: Option<String>,
}

impl OpenRouterConfig {
    /// Create a new configuration with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            models_timeout: MODELS_TIMEOUT,
            models_cache_ttl: MODELS_CACHE_TTL,
            app_name: DEFAULT_APP_NAME.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            provider_order: None,
        }
    }

    /// Create from environment variables
    ///
    /// Reads `OPENROUTER_API_KEY` (required), `OPENROUTER_BASE_URL`,
    /// `OPENROUTER_MODEL` and `OPENROUTER_PROVIDER` (optional).
    ///
    /// # Errors
    /// Returns the unavailable condition when `OPENROUTER_API_KEY` is not
    /// set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::unavailable(ProviderId::OpenRouter))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENROUTER_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
            config.default_model = model;
        }
        if let Ok(provider) = std::env::var("OPENROUTER_PROVIDER") {
            config.provider_order = Some(provider);
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the chat request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the model catalog cache lifetime
    #[must_use]
    pub fn with_models_cache_ttl(mut self, ttl: Duration) -> Self {
        self.models_cache_ttl = ttl;
        self
    }

    /// Set the application name for attribution headers
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the site URL for attribution headers
    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// Set the upstream provider the gateway should try first
    #[must_use]
    pub fn with_provider_order(mut self, provider: impl Into<String>) -> Self {
        self.provider_order = Some(provider.into());
        self
    }
}

impl fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .field("models_timeout", &self.models_timeout)
            .field("models_cache_ttl", &self.models_cache_ttl)
            .field("app_name", &self.app_name)
            .field("site_url", &self.site_url)
            .field("provider_order", &self.provider_order)
            .finish()
    }
}

// ============================================================
// Chat wire types
// ============================================================

#[derive(Debug, Serialize)]
pub(crate) struct OpenRouterRequest {
    pub model: String,
    pub messages: Vec<OpenRouterMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderPreferences>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenRouterMessage {
    pub role: String,
    pub content: String,
}

/// Upstream routing preferences forwarded by the gateway
#[derive(Debug, Serialize)]
pub(crate) struct ProviderPreferences {
    pub order: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
pub(crate) struct OpenRouterResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<OpenRouterChoice>,
    #[serde(default)]
    pub usage: Option<OpenRouterUsage>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
pub(crate) struct OpenRouterChoice {
    #[serde(default)]
    pub index: u32,
    pub message: OpenRouterMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
pub(crate) struct OpenRouterUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenRouterErrorResponse {
    pub error: OpenRouterErrorDetail,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
pub(crate) struct OpenRouterErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<i32>,
}

// ============================================================
// Model catalog types
// ============================================================

/// Model record from the OpenRouter catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    /// Provider-qualified model id
    pub id: String,
    /// Display name
    pub name: String,
    /// Context window, tokens
    pub context_length: u32,
    /// Catalog-reported rates, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelQuote>,
    /// Upstream vendor label
    pub provider: String,
}

/// Per-token rates as reported by the catalog (stringly typed upstream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelQuote {
    /// Prompt rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Completion rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<RawModel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawModel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context_length: Option<u32>,
    #[serde(default)]
    pub pricing: Option<ModelQuote>,
    #[serde(default)]
    pub provider: Option<RawModelProvider>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawModelProvider {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RawModel> for ModelInfo {
    fn from(raw: RawModel) -> Self {
        let name = raw.name.unwrap_or_else(|| raw.id.clone());
        Self {
            id: raw.id,
            name,
            context_length: raw.context_length.unwrap_or(DEFAULT_CONTEXT_LENGTH),
            pricing: raw.pricing,
            provider: raw
                .provider
                .and_then(|p| p.name)
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}
