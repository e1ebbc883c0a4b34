//! Chat endpoint
//!
//! `POST /api/v1/chat` routes a message through the resolved provider and
//! reports token usage and computed cost alongside the reply.

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use notelm_llm::{ChatRequest, ChatRouter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::error::{ApiError, ErrorBody};

/// Chat request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChatBody {
    /// User message, 1 to 50000 characters
    pub message: String,
    /// Provider override; unrecognized values use the default provider
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
    pub source_ids: Option<Vec<String>>,
    /// Display names for numbered citations, in retrieval order
    #[serde(default)]
    pub source_names: Option<Vec<String>>,
    /// Retrieved source text; presence switches on citation prompting
    #[serde(default)]
    pub context: Option<String>,
    /// Persona text prepended to the system instruction
    #[serde(default)]
    pub system_instruction: Option<String>,
    /// Sampling temperature in [0.0, 2.0], default 0.7
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Completion token budget in [1, 32768], default 4096
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl From<ChatBody> for ChatRequest {
    fn from(body: ChatBody) -> Self {
        ChatRequest {
            message: body.message,
            provider: body.provider,
            provider_model: body.provider_model,
            model: body.model,
            source_ids: body.source_ids.unwrap_or_default(),
            source_names: body.source_names.unwrap_or_default(),
            context: body.context,
            system_instruction: body.system_instruction,
            temperature: body.temperature,
            max_tokens: body.max_tokens,
        }
    }
}

/// Generated reply
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatData {
    /// Model output text
    pub content: String,
}

/// Token usage and computed cost for one request
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageView {
    /// Prompt tokens, as reported upstream
    pub input_tokens: u32,
    /// Completion tokens, as reported upstream
    pub output_tokens: u32,
    /// Computed cost in USD, rounded to 6 decimal places
    pub cost_usd: f64,
    /// Model the request was routed to
    pub model_used: String,
    /// Provider the request was routed to
    pub provider: String,
}

/// Chat response
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// Generated reply
    pub data: ChatData,
    /// Usage accounting for this request
    pub usage: UsageView,
}

/// Route a chat message and account its cost
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "chat",
    request_body = ChatBody,
    responses(
        (status = 200, description = "Generated reply with usage", body = ChatResponse),
        (status = 400, description = "Request failed validation", body = ErrorBody),
        (status = 502, description = "Upstream provider call failed", body = ErrorBody),
        (status = 503, description = "Requested provider not configured", body = ErrorBody)
    )
)]
pub async fn chat(
    Extension(router): Extension<Arc<ChatRouter>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = ChatRequest::from(body);
    let completion = router.generate(&request).await?;

    Ok(Json(ChatResponse {
        data: ChatData {
            content: completion.content,
        },
        usage: UsageView {
            input_tokens: completion.usage.input_tokens,
            output_tokens: completion.usage.output_tokens,
            cost_usd: completion.usage.cost_usd,
            model_used: completion.usage.model_used,
            provider: completion.usage.provider.to_string(),
        },
    }))
}

/// Create chat routes
pub fn chat_routes() -> Router {
    Router::new().route("/api/v1/chat", post(chat))
}
