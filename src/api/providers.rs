//! Provider catalog endpoints
//!
//! - `GET /api/v1/providers` — both providers with availability flags
//! - `GET /api/v1/providers/models` — live OpenRouter model catalog
//! - `GET /api/v1/providers/config` — effective routing configuration

use axum::extract::{Extension, Query};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use notelm_llm::{ChatRouter, ModelInfo, ProviderId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::error::{ApiError, ErrorBody};

/// One provider in the catalog listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderView {
    /// Stable provider id ("google" or "openrouter")
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// True when the credential is configured
    pub available: bool,
    /// Static model ids, display order
    pub models: Vec<String>,
}

/// Provider catalog response
#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    /// Both providers, always, in catalog order
    pub providers: Vec<ProviderView>,
    /// Provider used when a request does not name one
    pub default_provider: String,
    /// Model used when a request on the default provider does not name one
    pub default_model: String,
}

/// Catalog-reported rates, passed through as strings
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelPricingView {
    /// Prompt rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Completion rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
}

/// One model in the catalog listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelView {
    /// Provider-qualified model id
    pub id: String,
    /// Display name
    pub name: String,
    /// Context window, tokens
    pub context_length: u32,
    /// Rates as reported by the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricingView>,
    /// Upstream provider name
    pub provider: String,
}

/// Model catalog response
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelsResponse {
    /// Requested window of the catalog
    pub models: Vec<ModelView>,
    /// Total catalog size, before any pagination
    pub count: usize,
}

/// Pagination window for the model catalog
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ModelsQuery {
    /// Maximum models to return; omitted returns the whole catalog
    pub limit: Option<usize>,
    /// Models to skip from the start
    pub offset: Option<usize>,
}

/// Effective routing configuration
#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderConfigResponse {
    /// Configured default provider id, as loaded
    pub default_provider: String,
    /// Model used for OpenRouter requests that do not name one
    pub openrouter_default_model: String,
    /// Optional upstream routing hint forwarded to OpenRouter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter_provider: Option<String>,
    /// True when GOOGLE_API_KEY is set
    pub google_configured: bool,
    /// True when OPENROUTER_API_KEY is set
    pub openrouter_configured: bool,
}

/// List both providers with availability and static model lists
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "providers",
    responses(
        (status = 200, description = "Provider catalog", body = ProvidersResponse)
    )
)]
pub async fn list_providers(
    Extension(router): Extension<Arc<ChatRouter>>,
) -> Json<ProvidersResponse> {
    let registry = router.registry();
    let providers = registry
        .list()
        .into_iter()
        .map(|info| ProviderView {
            id: info.id.to_string(),
            name: info.name.to_string(),
            description: info.description.to_string(),
            available: info.available,
            models: info.models,
        })
        .collect();
    let (default_provider, default_model) = registry.default_selection();

    Json(ProvidersResponse {
        providers,
        default_provider: default_provider.to_string(),
        default_model: default_model.to_string(),
    })
}

/// Browse the OpenRouter model catalog
///
/// Served from a 30-minute cache; `count` is the full catalog size even when
/// `limit`/`offset` narrow the returned window.
#[utoipa::path(
    get,
    path = "/api/v1/providers/models",
    tag = "providers",
    params(ModelsQuery),
    responses(
        (status = 200, description = "Model catalog", body = ModelsResponse),
        (status = 502, description = "Catalog fetch failed", body = ErrorBody),
        (status = 503, description = "OpenRouter not configured", body = ErrorBody)
    )
)]
pub async fn list_models(
    Extension(router): Extension<Arc<ChatRouter>>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let openrouter = router.openrouter().map_err(|_| {
        ApiError::service_unavailable(
            "OpenRouter is not configured. Set OPENROUTER_API_KEY to browse the model catalog.",
        )
    })?;

    let catalog = openrouter.list_models().await?;
    let count = catalog.len();
    let models = window(catalog, &query).into_iter().map(model_view).collect();

    Ok(Json(ModelsResponse { models, count }))
}

/// Effective routing configuration with credential presence flags
#[utoipa::path(
    get,
    path = "/api/v1/providers/config",
    tag = "providers",
    responses(
        (status = 200, description = "Routing configuration", body = ProviderConfigResponse)
    )
)]
pub async fn provider_config(
    Extension(router): Extension<Arc<ChatRouter>>,
) -> Json<ProviderConfigResponse> {
    let settings = router.settings();
    Json(ProviderConfigResponse {
        default_provider: settings.default_provider.clone(),
        openrouter_default_model: settings.openrouter_default_model.clone(),
        openrouter_provider: settings.openrouter_provider.clone(),
        google_configured: settings.is_configured(ProviderId::Google),
        openrouter_configured: settings.is_configured(ProviderId::OpenRouter),
    })
}

/// Apply the pagination window to the catalog
fn window(models: Vec<ModelInfo>, query: &ModelsQuery) -> Vec<ModelInfo> {
    models
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect()
}

fn model_view(info: ModelInfo) -> ModelView {
    ModelView {
        id: info.id,
        name: info.name,
        context_length: info.context_length,
        pricing: info.pricing.map(|quote| ModelPricingView {
            prompt: quote.prompt,
            completion: quote.completion,
        }),
        provider: info.provider,
    }
}

/// Create provider routes
pub fn provider_routes() -> Router {
    Router::new()
        .route("/api/v1/providers", get(list_providers))
        .route("/api/v1/providers/models", get(list_models))
        .route("/api/v1/providers/config", get(provider_config))
}
