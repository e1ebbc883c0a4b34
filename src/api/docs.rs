//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{
    chat::{ChatBody, ChatData, ChatResponse, UsageView},
    error::{ErrorBody, ErrorDetail},
    providers::{
        ModelPricingView, ModelView, ModelsQuery, ModelsResponse, ProviderConfigResponse,
        ProviderView, ProvidersResponse,
    },
};

/// NoteLM API OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NoteLM API",
        version = "1.0.0",
        description = "Research assistant REST API for provider routing and cost accounting.

## Overview
NoteLM routes chat requests across LLM providers and accounts their cost:
- **Providers**: List providers, browse the OpenRouter model catalog, inspect routing configuration
- **Chat**: Generate source-grounded answers with per-request token usage and USD cost

Requests pick a provider explicitly or fall back to the configured default.
Model names are passed to providers verbatim, so new models work without a server update.
",
        contact(
            name = "NoteLM Team",
            url = "https://notelm.app"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Providers
        crate::api::providers::list_providers,
        crate::api::providers::list_models,
        crate::api::providers::provider_config,
        // Chat
        crate::api::chat::chat,
    ),
    components(
        schemas(
            // Providers
            ProvidersResponse,
            ProviderView,
            ModelsQuery,
            ModelsResponse,
            ModelView,
            ModelPricingView,
            ProviderConfigResponse,
            // Chat
            ChatBody,
            ChatResponse,
            ChatData,
            UsageView,
            // Errors
            ErrorBody,
            ErrorDetail,
        )
    ),
    tags(
        (name = "providers", description = "Provider catalog and routing configuration"),
        (name = "chat", description = "Chat generation with cost accounting"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "NoteLM API");
        assert!(doc.paths.paths.contains_key("/api/v1/providers"));
        assert!(doc.paths.paths.contains_key("/api/v1/providers/models"));
        assert!(doc.paths.paths.contains_key("/api/v1/providers/config"));
        assert!(doc.paths.paths.contains_key("/api/v1/chat"));
    }
}
