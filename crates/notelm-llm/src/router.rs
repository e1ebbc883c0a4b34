//! Request routing and dispatch
//!
//! [`ChatRouter`] owns one client per configured provider, resolves each
//! request to a concrete (provider, model) pair, dispatches the call and
//! attaches normalized usage accounting to the result. Generation calls are
//! dispatched exactly once; the router never retries them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::cost;
use crate::error::{Error, Result};
use crate::prompt;
use crate::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::providers::openrouter::{OpenRouterConfig, OpenRouterProvider};
use crate::registry::{ProviderId, ProviderRegistry};
use crate::settings::LlmSettings;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Upper bound on message length, characters
pub const MAX_MESSAGE_CHARS: usize = 50_000;

/// Upper bound on attached source context, characters
pub const MAX_CONTEXT_CHARS: usize = 100_000;

/// Upper bound on system instructions, characters
pub const MAX_SYSTEM_CHARS: usize = 10_000;

/// Upper bound on the completion token budget
pub const MAX_TOKENS_LIMIT: u32 = 32_768;

/// Inbound chat request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// User message
    pub message: String,
    /// Provider override; unrecognized values fall back to the default
    #[serde(default)]
    pub provider: Option<String>,
    /// Model override, checked before `model`
    #[serde(default)]
    pub provider_model: Option<String>,
    /// Model override alias
    #[serde(default)]
    pub model: Option<String>,
    /// Opaque source identifiers owned by the retrieval layer
    #[serde(default)]
    pub source_ids: Vec<String>,
    /// Display names for numbered citations, in retrieval order
    #[serde(default)]
    pub source_names: Vec<String>,
    /// Retrieved source text; presence switches on citation prompting
    #[serde(default)]
    pub context: Option<String>,
    /// Persona text prepended to the system instruction
    #[serde(default)]
    pub system_instruction: Option<String>,
    /// Sampling temperature in [0.0, 2.0]
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Completion token budget in [1, 32768]
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request with just a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Name the provider to route to
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Name the model, taking precedence over `with_model`
    #[must_use]
    pub fn with_provider_model(mut self, model: impl Into<String>) -> Self {
        self.provider_model = Some(model.into());
        self
    }

    /// Name the model via the alias field
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach retrieved source text
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach display names for citation numbering
    #[must_use]
    pub fn with_source_names(mut self, names: Vec<String>) -> Self {
        self.source_names = names;
        self
    }

    /// Set persona text for the system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token budget
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check request bounds before dispatch
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.message.trim().is_empty() {
            return Err(Error::InvalidRequest("message must not be empty".into()));
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(Error::InvalidRequest(format!(
                "message exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }
        if let Some(context) = &self.context {
            if context.trim().is_empty() {
                return Err(Error::InvalidRequest(
                    "context must not be empty when provided".into(),
                ));
            }
            if context.chars().count() > MAX_CONTEXT_CHARS {
                return Err(Error::InvalidRequest(format!(
                    "context exceeds {MAX_CONTEXT_CHARS} characters"
                )));
            }
        }
        if let Some(system) = &self.system_instruction {
            if system.chars().count() > MAX_SYSTEM_CHARS {
                return Err(Error::InvalidRequest(format!(
                    "system_instruction exceeds {MAX_SYSTEM_CHARS} characters"
                )));
            }
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(Error::InvalidRequest(
                    "temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }
        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 || max_tokens > MAX_TOKENS_LIMIT {
                return Err(Error::InvalidRequest(format!(
                    "max_tokens must be between 1 and {MAX_TOKENS_LIMIT}"
                )));
            }
        }
        Ok(())
    }
}

/// Prompt handed to a backend client after routing
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Model id, sent verbatim
    pub model: String,
    /// Fully assembled user prompt
    pub prompt: String,
    /// Optional system instruction
    pub system: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token budget
    pub max_tokens: u32,
}

impl GenerateRequest {
    /// Create a request with default sampling parameters
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the system instruction
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token budget
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Backend output: generated text plus provider-reported token counts
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Generated text
    pub content: String,
    /// Prompt tokens as reported by the provider, 0 when unreported
    pub input_tokens: u32,
    /// Completion tokens as reported by the provider, 0 when unreported
    pub output_tokens: u32,
}

/// Chat generation capability implemented by each provider client
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable provider identity
    fn id(&self) -> ProviderId;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Execute one generation call
    ///
    /// # Errors
    /// Returns an error when the upstream call fails or the response cannot
    /// be interpreted.
    async fn generate(&self, request: &GenerateRequest) -> Result<Generation>;
}

/// Resolved (provider, model) pair for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Selected provider
    pub provider: ProviderId,
    /// Model id to send, verbatim
    pub model: String,
}

/// Normalized accounting block attached to every completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Usage {
    /// Prompt tokens
    pub input_tokens: u32,
    /// Completion tokens
    pub output_tokens: u32,
    /// Estimated cost in USD, 6 decimal places
    pub cost_usd: f64,
    /// Model id the request was dispatched with
    pub model_used: String,
    /// Provider that served the request
    pub provider: ProviderId,
}

/// Routed generation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletion {
    /// Generated text
    pub content: String,
    /// Accounting block
    pub usage: Usage,
}

/// Routes chat requests to the configured provider clients
pub struct ChatRouter {
    settings: LlmSettings,
    registry: ProviderRegistry,
    providers: HashMap<ProviderId, Arc<dyn LlmProvider>>,
    openrouter: Option<Arc<OpenRouterProvider>>,
}

impl ChatRouter {
    /// Build the router and its provider clients from settings
    ///
    /// Providers without credentials are skipped rather than failing startup;
    /// requests for them are rejected at resolution time.
    ///
    /// # Errors
    /// Returns an error if a configured provider's HTTP client cannot be
    /// created.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let registry = ProviderRegistry::new(settings);
        let mut providers: HashMap<ProviderId, Arc<dyn LlmProvider>> = HashMap::new();
        let mut openrouter = None;

        if settings.is_configured(ProviderId::Google) {
            let config = GeminiConfig::new(&settings.google_api_key);
            providers.insert(
                ProviderId::Google,
                Arc::new(GeminiProvider::new(config)?) as Arc<dyn LlmProvider>,
            );
            info!("registered provider: google");
        }

        if settings.is_configured(ProviderId::OpenRouter) {
            let mut config = OpenRouterConfig::new(&settings.openrouter_api_key)
                .with_model(&settings.openrouter_default_model)
                .with_app_name(&settings.app_name)
                .with_site_url(&settings.site_url);
            if let Some(hint) = &settings.openrouter_provider {
                config = config.with_provider_order(hint);
            }
            let provider = Arc::new(OpenRouterProvider::new(config)?);
            providers.insert(
                ProviderId::OpenRouter,
                Arc::clone(&provider) as Arc<dyn LlmProvider>,
            );
            openrouter = Some(provider);
            info!("registered provider: openrouter");
        }

        if providers.is_empty() {
            warn!("no LLM provider configured, chat requests will be rejected");
        }

        Ok(Self {
            settings: settings.clone(),
            registry,
            providers,
            openrouter,
        })
    }

    /// Replace or add a provider client
    ///
    /// Used to install scripted backends in tests.
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// The provider catalog backing this router
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Settings snapshot the router was built from
    #[must_use]
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// The OpenRouter client, for catalog operations
    ///
    /// # Errors
    /// Returns the unavailable condition when no OpenRouter key is set.
    pub fn openrouter(&self) -> Result<&OpenRouterProvider> {
        self.openrouter
            .as_deref()
            .ok_or_else(|| Error::unavailable(ProviderId::OpenRouter))
    }

    /// Resolve the (provider, model) pair for a request
    ///
    /// Provider: the request's `provider` field when it names a known id,
    /// otherwise the configured default. An unavailable selection is an
    /// error, never a silent fallback to another provider.
    ///
    /// Model: `provider_model` first, then `model`, both passed through
    /// verbatim without catalog validation; otherwise the provider's default.
    ///
    /// # Errors
    /// Returns [`Error::ProviderUnavailable`] when the selected provider has
    /// no credential configured.
    pub fn resolve(&self, request: &ChatRequest) -> Result<Route> {
        let provider = request
            .provider
            .as_deref()
            .and_then(ProviderId::parse)
            .unwrap_or_else(|| self.registry.default_provider());

        self.registry.require_available(provider)?;

        let model = request
            .provider_model
            .as_deref()
            .or(request.model.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.registry.default_model_for(provider).to_string());

        Ok(Route { provider, model })
    }

    /// Generate a chat completion
    ///
    /// Validates, resolves, dispatches exactly once and computes the cost
    /// from the local pricing table. Provider-reported cost figures are
    /// ignored.
    ///
    /// # Errors
    /// Returns validation, resolution or upstream errors; an error carries
    /// no usage block.
    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        request.validate()?;
        let route = self.resolve(request)?;

        let backend = self
            .providers
            .get(&route.provider)
            .ok_or_else(|| Error::unavailable(route.provider))?;

        let generate_request = Self::build_generate_request(request, &route);
        debug!(provider = %route.provider, model = %route.model, "dispatching generation");
        let generation = backend.generate(&generate_request).await?;

        let cost_usd = cost::calculate_cost(
            &route.model,
            generation.input_tokens,
            generation.output_tokens,
        );
        info!(
            provider = %route.provider,
            model = %route.model,
            input_tokens = generation.input_tokens,
            output_tokens = generation.output_tokens,
            cost_usd,
            "generation complete"
        );

        Ok(ChatCompletion {
            content: generation.content,
            usage: Usage {
                input_tokens: generation.input_tokens,
                output_tokens: generation.output_tokens,
                cost_usd,
                model_used: route.model,
                provider: route.provider,
            },
        })
    }

    fn build_generate_request(request: &ChatRequest, route: &Route) -> GenerateRequest {
        let persona = request
            .system_instruction
            .as_deref()
            .filter(|p| !p.trim().is_empty());

        let (user_prompt, system) = match request.context.as_deref() {
            Some(context) => (
                prompt::with_sources(&request.message, context, &request.source_names),
                Some(prompt::system_instruction(persona)),
            ),
            None => (request.message.clone(), persona.map(str::to_string)),
        };

        let mut generate_request = GenerateRequest::new(&route.model, user_prompt)
            .with_temperature(request.temperature.unwrap_or(DEFAULT_TEMPERATURE))
            .with_max_tokens(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));
        if let Some(system) = system {
            generate_request = generate_request.with_system(system);
        }
        generate_request
    }
}
