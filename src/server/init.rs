//! Server initialization and run loop

use super::loader::load_config;
use crate::middleware::rate_limit::RateLimitLayer;
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Extension, Router};
use notelm_llm::ChatRouter;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting NoteLM server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    config.validate()?;

    // ================================================================
    // Provider Routing
    // ================================================================
    let settings = config.llm.to_settings();
    let chat_router = Arc::new(
        ChatRouter::from_settings(&settings).context("Failed to initialize provider routing")?,
    );

    // ================================================================
    // Rate Limiting
    // ================================================================
    let rate_limit_layer = RateLimitLayer::new(&config.server.rate_limit);
    if config.server.rate_limit.enabled {
        rate_limit_layer.state().spawn_cleanup();
        info!(
            "Rate limiting ENABLED ({}rpm/client, {}rpm global)",
            config.server.rate_limit.requests_per_minute,
            config.server.rate_limit.global_requests_per_minute
        );
    } else {
        info!("Rate limiting DISABLED");
    }

    // Build the main router with all endpoints
    let app = Router::new()
        // Health endpoints (public, for load balancers)
        .merge(crate::api::health_routes())
        // API documentation (Swagger UI at /docs)
        .merge(crate::api::docs_routes())
        // API routes
        .merge(crate::api::api_router())
        // Service identity at root
        .route("/", get(root_info))
        // Layers (applied to all routes)
        .layer(Extension(chat_router))
        .layer(rate_limit_layer)
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);
    info!("API documentation at http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("NoteLM shutdown complete");
    Ok(())
}

/// Root endpoint with service identity
async fn root_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "NoteLM API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs",
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_info_names_service() {
        let Json(body) = root_info().await;
        assert_eq!(body["name"], "NoteLM API");
        assert_eq!(body["docs"], "/docs");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
