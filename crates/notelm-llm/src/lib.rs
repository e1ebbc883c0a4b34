//! NoteLM LLM - Provider Routing and Cost Accounting
//!
//! This crate provides LLM integration for NoteLM:
//! - Registry: static provider catalog with configuration-derived availability
//! - Router: capability trait, request resolution and single-dispatch generation
//! - Cost: hardcoded pricing snapshot and USD accounting
//! - Prompt: source-grounded prompt assembly with citation scaffolding
//! - Gemini: Google Gemini provider (direct API)
//! - OpenRouter: multi-provider gateway with a TTL-cached model catalog

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cost;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod router;
pub mod settings;
pub mod util;

pub use cost::{calculate_cost, fallback_pricing, pricing_for, ModelPricing, FALLBACK_MODEL};
pub use error::{Error, Result};
pub use registry::{ProviderId, ProviderInfo, ProviderRegistry};
pub use router::{
    ChatCompletion, ChatRequest, ChatRouter, GenerateRequest, Generation, LlmProvider, Route,
    Usage, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use settings::LlmSettings;

// Re-export provider types
pub use providers::gemini::{GeminiConfig, GeminiProvider};
pub use providers::openrouter::{ModelInfo, ModelQuote, OpenRouterConfig, OpenRouterProvider};
