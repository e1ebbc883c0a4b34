//! Web API module for NoteLM
//!
//! Provides REST API endpoints for:
//! - Provider catalog and routing configuration
//! - OpenRouter model catalog browsing
//! - Chat generation with cost accounting
//! - Health checks and OpenAPI documentation

pub mod chat;
pub mod docs;
pub mod error;
pub mod health;
pub mod providers;

use axum::Router;

pub use chat::chat_routes;
pub use docs::docs_routes;
pub use health::health_routes;
pub use providers::provider_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new().merge(provider_routes()).merge(chat_routes())
}
