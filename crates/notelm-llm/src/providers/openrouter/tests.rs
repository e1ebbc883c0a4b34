//! OpenRouter provider unit tests

use std::time::Duration;

use super::catalog::CachedModels;
use super::provider::OpenRouterProvider;
use super::types::*;
use crate::router::{GenerateRequest, LlmProvider};

fn config() -> OpenRouterConfig {
    OpenRouterConfig::new("sk-or-v1-test-key-456")
}

fn provider() -> OpenRouterProvider {
    OpenRouterProvider::new(config()).unwrap()
}

fn sample_model(id: &str) -> ModelInfo {
    ModelInfo {
        id: id.to_string(),
        name: id.to_string(),
        context_length: 200_000,
        pricing: None,
        provider: "anthropic".to_string(),
    }
}

#[test]
fn test_config_defaults() {
    let config = config();
    assert_eq!(config.base_url, BASE_URL);
    assert_eq!(config.default_model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.timeout.as_secs(), 60);
    assert_eq!(config.models_timeout.as_secs(), 30);
    assert_eq!(config.models_cache_ttl.as_secs(), 1800);
    assert_eq!(config.app_name, "NoteLM");
    assert!(config.provider_order.is_none());
}

#[test]
fn test_config_builders() {
    let config = config()
        .with_base_url("http://localhost:9000")
        .with_model("openai/gpt-4-turbo")
        .with_app_name("TestApp")
        .with_site_url("https://test.example")
        .with_provider_order("Anthropic")
        .with_models_cache_ttl(Duration::from_secs(5));
    assert_eq!(config.base_url, "http://localhost:9000");
    assert_eq!(config.default_model, "openai/gpt-4-turbo");
    assert_eq!(config.app_name, "TestApp");
    assert_eq!(config.site_url, "https://test.example");
    assert_eq!(config.provider_order.as_deref(), Some("Anthropic"));
    assert_eq!(config.models_cache_ttl.as_secs(), 5);
}

#[test]
fn test_config_debug_masks_key() {
    let debug = format!("{:?}", config());
    assert!(!debug.contains("sk-or-v1-test-key-456"));
    assert!(debug.contains("sk-o...-456"));
}

#[test]
fn test_provider_identity() {
    let provider = provider();
    assert_eq!(provider.id(), crate::registry::ProviderId::OpenRouter);
    assert_eq!(provider.default_model(), "anthropic/claude-3.5-sonnet");
}

#[test]
fn test_model_catalog_contains_default() {
    assert!(MODELS.contains(&DEFAULT_MODEL));
    assert_eq!(MODELS.len(), 11);
}

// ============================================================
// Chat request serialization
// ============================================================

#[test]
fn test_build_messages_with_system() {
    let request = GenerateRequest::new("openai/gpt-4", "hello").with_system("be brief");
    let messages = OpenRouterProvider::build_messages(&request);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[0].content, "be brief");
    assert_eq!(messages[1].role, "user");
    assert_eq!(messages[1].content, "hello");
}

#[test]
fn test_build_messages_without_system() {
    let request = GenerateRequest::new("openai/gpt-4", "hello");
    let messages = OpenRouterProvider::build_messages(&request);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, "user");
}

#[test]
fn test_build_request_with_provider_hint() {
    let provider = OpenRouterProvider::new(config().with_provider_order("Anthropic")).unwrap();
    let request = GenerateRequest::new("anthropic/claude-3.5-sonnet", "hello")
        .with_temperature(0.5)
        .with_max_tokens(512);
    let json = serde_json::to_value(provider.build_request(&request)).unwrap();

    assert_eq!(json["model"], "anthropic/claude-3.5-sonnet");
    assert_eq!(json["max_tokens"], 512);
    assert_eq!(json["provider"]["order"][0], "Anthropic");
}

#[test]
fn test_build_request_without_hint_omits_preferences() {
    let json = serde_json::to_value(
        provider().build_request(&GenerateRequest::new("openai/gpt-4", "hello")),
    )
    .unwrap();
    assert!(json.get("provider").is_none());
}

// ============================================================
// Chat response parsing
// ============================================================

#[test]
fn test_parse_chat_response() {
    let json = r#"{
        "id": "gen-1",
        "model": "anthropic/claude-3.5-sonnet",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hi."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    }"#;

    let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.choices[0].message.content, "Hi.");
    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 9);
    assert_eq!(usage.completion_tokens, 3);
}

#[test]
fn test_parse_response_missing_usage_defaults_to_zero() {
    let json = r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}]}"#;
    let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
    let usage = response.usage.unwrap_or_default();
    assert_eq!(usage.prompt_tokens, 0);
    assert_eq!(usage.completion_tokens, 0);
}

#[test]
fn test_parse_error_body() {
    let json = r#"{"error": {"message": "Invalid model", "code": 400}}"#;
    let error: OpenRouterErrorResponse = serde_json::from_str(json).unwrap();
    assert_eq!(error.error.message, "Invalid model");
    assert_eq!(error.error.code, Some(400));
}

// ============================================================
// Model catalog
// ============================================================

#[test]
fn test_catalog_mapping_fills_defaults() {
    let json = r#"{"data": [
        {
            "id": "anthropic/claude-3.5-sonnet",
            "name": "Claude 3.5 Sonnet",
            "context_length": 200000,
            "pricing": {"prompt": "0.000003", "completion": "0.000015"},
            "provider": {"name": "Anthropic"}
        },
        {"id": "mystery/model-x"}
    ]}"#;

    let parsed: ModelsResponse = serde_json::from_str(json).unwrap();
    let models: Vec<ModelInfo> = parsed.data.into_iter().map(ModelInfo::from).collect();

    assert_eq!(models[0].name, "Claude 3.5 Sonnet");
    assert_eq!(models[0].context_length, 200_000);
    assert_eq!(models[0].provider, "Anthropic");
    let quote = models[0].pricing.as_ref().unwrap();
    assert_eq!(quote.prompt.as_deref(), Some("0.000003"));
    assert_eq!(quote.completion.as_deref(), Some("0.000015"));

    assert_eq!(models[1].name, "mystery/model-x");
    assert_eq!(models[1].context_length, DEFAULT_CONTEXT_LENGTH);
    assert_eq!(models[1].provider, "unknown");
    assert!(models[1].pricing.is_none());
}

#[test]
fn test_catalog_parse_empty_data() {
    let parsed: ModelsResponse = serde_json::from_str(r"{}").unwrap();
    assert!(parsed.data.is_empty());
}

#[test]
fn test_cached_models_freshness() {
    let cached = CachedModels::new(vec![]);
    assert!(cached.is_fresh(Duration::from_secs(60)));
    assert!(!cached.is_fresh(Duration::ZERO));
}

#[tokio::test]
async fn test_list_models_serves_fresh_cache() {
    let provider = provider();
    let models = vec![sample_model("anthropic/claude-3.5-sonnet")];
    *provider.models_cache.write().await = Some(CachedModels::new(models.clone()));

    // Cache is fresh, so no network call happens
    let listed = provider.list_models().await.unwrap();
    assert_eq!(listed, models);
}

#[test]
fn test_clear_models_cache_drops_snapshot() {
    tokio_test::block_on(async {
        let provider = provider();
        *provider.models_cache.write().await = Some(CachedModels::new(vec![]));
        provider.clear_models_cache().await;
        assert!(provider.models_cache.read().await.is_none());
    });
}
