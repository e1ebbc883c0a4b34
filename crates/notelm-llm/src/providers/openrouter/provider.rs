//! OpenRouter provider implementation

use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::catalog::CachedModels;
use super::types::{
    OpenRouterConfig, OpenRouterErrorResponse, OpenRouterMessage, OpenRouterRequest,
    OpenRouterResponse, ProviderPreferences,
};
use crate::error::{Error, Result};
use crate::registry::ProviderId;
use crate::router::{GenerateRequest, Generation, LlmProvider};
use crate::util::sanitize_api_error;

/// OpenRouter chat provider with model catalog access
#[derive(Debug)]
pub struct OpenRouterProvider {
    pub(super) client: Client,
    pub(super) config: OpenRouterConfig,
    pub(super) models_cache: RwLock<Option<CachedModels>>,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            models_cache: RwLock::new(None),
        })
    }

    /// Create from environment variables
    ///
    /// # Errors
    /// Returns the unavailable condition when `OPENROUTER_API_KEY` is not
    /// set.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenRouterConfig::from_env()?)
    }

    /// The configuration this provider was built with
    #[must_use]
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    pub(super) fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", &self.config.app_name)
    }

    pub(crate) fn build_messages(request: &GenerateRequest) -> Vec<OpenRouterMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(OpenRouterMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(OpenRouterMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });
        messages
    }

    pub(crate) fn build_request(&self, request: &GenerateRequest) -> OpenRouterRequest {
        OpenRouterRequest {
            model: request.model.clone(),
            messages: Self::build_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            provider: self
                .config
                .provider_order
                .as_ref()
                .map(|hint| ProviderPreferences {
                    order: vec![hint.clone()],
                }),
        }
    }

    async fn send(&self, body: &OpenRouterRequest) -> Result<OpenRouterResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .authed(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(self.config.timeout.as_secs())
                } else {
                    Error::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenRouterErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.clone());
            return Err(Error::Api(sanitize_api_error(&message)));
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenRouterProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenRouter
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> Result<Generation> {
        let body = self.build_request(request);
        debug!("sending request to OpenRouter API");
        let response = self.send(&body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("no choices in response".to_string()))?;

        let usage = response.usage.unwrap_or_default();

        Ok(Generation {
            content: choice.message.content,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        })
    }
}
