//! OpenRouter provider
//!
//! Talks to the OpenRouter gateway with its OpenAI-compatible chat endpoint
//! and exposes the live model catalog with a TTL cache. Attribution headers
//! (`HTTP-Referer`, `X-Title`) identify this application upstream.

mod catalog;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use provider::OpenRouterProvider;
pub use types::{ModelInfo, ModelQuote, OpenRouterConfig, DEFAULT_MODEL, MODELS};
