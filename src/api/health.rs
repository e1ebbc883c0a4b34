//! Health check endpoints
//!
//! Provides:
//! - `/health` — simple "healthy" + version (for load balancers)
//! - `/health/detailed` — provider routing status, no upstream calls

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use notelm_llm::ChatRouter;
use serde::Serialize;
use std::sync::Arc;

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health response with routing checks
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

/// All component health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub llm: ComponentHealth,
}

/// Individual component health status
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    fn healthy_with_details(details: serde_json::Value) -> Self {
        Self {
            status: "healthy",
            error: None,
            details: Some(details),
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            error: Some(error),
            details: None,
        }
    }
}

/// Simple health check (for load balancers)
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Detailed health check (lightweight — no upstream API calls)
async fn detailed_health_check(
    Extension(router): Extension<Arc<ChatRouter>>,
) -> Json<DetailedHealthResponse> {
    let llm_health = check_llm(&router);

    let overall_status = if llm_health.status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(DetailedHealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { llm: llm_health },
    })
}

/// Check provider routing readiness from configuration alone
fn check_llm(router: &ChatRouter) -> ComponentHealth {
    let registry = router.registry();
    let configured = registry
        .list()
        .iter()
        .filter(|provider| provider.available)
        .count();

    if configured == 0 {
        return ComponentHealth::unhealthy(
            "no provider configured; set GOOGLE_API_KEY or OPENROUTER_API_KEY".to_string(),
        );
    }

    let (default_provider, default_model) = registry.default_selection();
    ComponentHealth::healthy_with_details(serde_json::json!({
        "default_provider": default_provider.as_str(),
        "default_model": default_model,
        "providers_configured": configured,
    }))
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notelm_llm::LlmSettings;

    fn router_with(google: &str, openrouter: &str) -> Arc<ChatRouter> {
        let settings = LlmSettings::default()
            .with_google_key(google)
            .with_openrouter_key(openrouter);
        Arc::new(ChatRouter::from_settings(&settings).unwrap())
    }

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_detailed_health_with_provider() {
        let router = router_with("google-test-key", "");
        let Json(resp) = detailed_health_check(Extension(router)).await;

        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.checks.llm.status, "healthy");
        let details = resp.checks.llm.details.unwrap();
        assert_eq!(details["default_provider"], "google");
        assert_eq!(details["providers_configured"], 1);
    }

    #[tokio::test]
    async fn test_detailed_health_without_providers_degrades() {
        let router = router_with("", "");
        let Json(resp) = detailed_health_check(Extension(router)).await;

        assert_eq!(resp.status, "degraded");
        assert_eq!(resp.checks.llm.status, "unhealthy");
        assert!(resp.checks.llm.error.as_deref().unwrap().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_health_response_serialization() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }
}
