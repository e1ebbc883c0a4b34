//! Server configuration types
//!
//! Contains all configuration structures for the NoteLM server.

use crate::middleware::rate_limit::RateLimitSettings;
use anyhow::{bail, Result};
use notelm_llm::LlmSettings;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]

pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Check the loaded configuration before startup
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            bail!("server.host must not be empty");
        }
        if notelm_llm::ProviderId::parse(&self.llm.default_provider).is_none() {
            warn!(
                provider = %self.llm.default_provider,
                "llm.default_provider is not recognized, requests will route to google"
            );
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Provider routing configuration
///
/// Credentials are never read from TOML. `GOOGLE_API_KEY` and
/// `OPENROUTER_API_KEY` come from the environment alone.
#[derive(Debug, Clone, Serialize, Deserialize)]

pub struct LlmConfig {
    /// Provider used when a request does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model for OpenRouter requests that do not name one
    #[serde(default = "default_openrouter_model")]
    pub openrouter_default_model: String,
    /// Optional upstream routing hint forwarded to OpenRouter
    #[serde(default)]
    pub openrouter_provider: Option<String>,
    /// Application name for OpenRouter attribution headers
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Site URL for OpenRouter attribution headers
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

impl LlmConfig {
    /// Build routing settings from this config plus the environment
    ///
    /// Config supplies the defaults; plain environment variables
    /// (`GOOGLE_API_KEY`, `OPENROUTER_API_KEY`, `DEFAULT_LLM_PROVIDER`,
    /// `OPENROUTER_MODEL`, `OPENROUTER_PROVIDER`) overlay them when set.
    pub fn to_settings(&self) -> LlmSettings {
        let mut settings = LlmSettings::default()
            .with_default_provider(&self.default_provider)
            .with_openrouter_model(&self.openrouter_default_model)
            .with_app_name(&self.app_name)
            .with_site_url(&self.site_url);
        if let Some(provider) = &self.openrouter_provider {
            settings = settings.with_openrouter_provider(provider.clone());
        }

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            settings = settings.with_google_key(key);
        }
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            settings = settings.with_openrouter_key(key);
        }
        if let Ok(provider) = std::env::var("DEFAULT_LLM_PROVIDER") {
            settings = settings.with_default_provider(provider);
        }
        if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
            settings = settings.with_openrouter_model(model);
        }
        if let Ok(provider) = std::env::var("OPENROUTER_PROVIDER") {
            settings = settings.with_openrouter_provider(provider);
        }

        settings
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            openrouter_default_model: default_openrouter_model(),
            openrouter_provider: None,
            app_name: default_app_name(),
            site_url: default_site_url(),
        }
    }
}

fn default_provider() -> String {
    notelm_llm::settings::DEFAULT_PROVIDER.to_string()
}

fn default_openrouter_model() -> String {
    notelm_llm::settings::DEFAULT_OPENROUTER_MODEL.to_string()
}

fn default_app_name() -> String {
    notelm_llm::settings::DEFAULT_APP_NAME.to_string()
}

fn default_site_url() -> String {
    notelm_llm::settings::DEFAULT_SITE_URL.to_string()
}
