//! Google Gemini provider
//!
//! Calls the generative language API directly with the `generateContent`
//! endpoint. Token counts come from the response `usageMetadata` block.

mod provider;
mod types;


pub use provider::GeminiProvider;
pub use types::{GeminiConfig, DEFAULT_MODEL, MODELS};
