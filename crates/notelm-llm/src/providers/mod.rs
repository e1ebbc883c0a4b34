//! Provider client implementations

/// Google Gemini, called directly on the Google AI API
pub mod gemini;

/// OpenRouter multi-provider gateway
pub mod openrouter;
