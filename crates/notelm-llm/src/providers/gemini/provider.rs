//! Gemini provider implementation

use reqwest::Client;
use tracing::{debug, instrument};

use super::types::{
    GeminiConfig, GeminiContent, GeminiErrorResponse, GeminiRequest, GeminiResponse,
    GenerationConfig,
};
use crate::error::{Error, Result};
use crate::registry::ProviderId;
use crate::router::{GenerateRequest, Generation, LlmProvider};
use crate::util::sanitize_api_error;

/// Google Gemini chat provider
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    ///
    /// # Errors
    /// Returns the unavailable condition when `GOOGLE_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub(crate) fn build_request(request: &GenerateRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user(&request.prompt)],
            system_instruction: request.system.as_deref().map(GeminiContent::system),
            generation_config: Some(GenerationConfig {
                temperature: Some(request.temperature),
                max_output_tokens: Some(request.max_tokens),
            }),
        }
    }

    async fn send(&self, model: &str, body: &GeminiRequest) -> Result<GeminiResponse> {
        // The key rides in the query string, so URLs must never reach logs
        // or error messages.
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
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
            let message = serde_json::from_str::<GeminiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.clone());
            return Err(Error::Api(sanitize_api_error(&message)));
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    pub(crate) fn extract_content(response: &GeminiResponse) -> Result<String> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| Error::InvalidResponse("no candidates in response".to_string()))?;

        let content = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::InvalidResponse(
                "empty candidate content".to_string(),
            ));
        }
        Ok(content)
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> Result<Generation> {
        let body = Self::build_request(request);
        debug!("sending request to Gemini API");
        let response = self.send(&request.model, &body).await?;

        let content = Self::extract_content(&response)?;
        let usage = response.usage_metadata.unwrap_or_default();

        Ok(Generation {
            content,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        })
    }
}
