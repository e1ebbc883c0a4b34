//! OpenRouter model catalog
//!
//! The `/models` listing changes rarely, so fetched snapshots are cached for
//! a TTL. Fetches retry with bounded exponential backoff: network failures
//! and 5xx statuses are transient, 4xx statuses are permanent.

use std::time::Instant;

use backoff::ExponentialBackoff;
use tracing::{debug, instrument};

use super::provider::OpenRouterProvider;
use super::types::{ModelInfo, ModelsResponse, OpenRouterErrorResponse};
use crate::error::{Error, Result};
use crate::util::sanitize_api_error;

/// Total elapsed-time budget for catalog fetch retries
const RETRY_BUDGET: std::time::Duration = std::time::Duration::from_secs(10);

/// A fetched catalog snapshot with its fetch time
#[derive(Debug, Clone)]
pub(super) struct CachedModels {
    pub(super) fetched_at: Instant,
    pub(super) models: Vec<ModelInfo>,
}

impl CachedModels {
    pub(super) fn new(models: Vec<ModelInfo>) -> Self {
        Self {
            fetched_at: Instant::now(),
            models,
        }
    }

    pub(super) fn is_fresh(&self, ttl: std::time::Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

impl OpenRouterProvider {
    /// List available models, serving from the cache while fresh
    ///
    /// # Errors
    /// Returns an error when the cache is stale and the upstream fetch
    /// fails after retries.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        if let Some(cached) = self.models_cache.read().await.as_ref() {
            if cached.is_fresh(self.config.models_cache_ttl) {
                debug!(count = cached.models.len(), "serving model catalog from cache");
                return Ok(cached.models.clone());
            }
        }
        self.refresh_models().await
    }

    /// Fetch the catalog from upstream, replacing any cached snapshot
    ///
    /// # Errors
    /// Returns an error when the fetch fails after retries; a stale cache
    /// entry is kept in that case.
    #[instrument(skip(self))]
    pub async fn refresh_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self.fetch_models().await?;
        debug!(count = models.len(), "model catalog refreshed");
        let mut cache = self.models_cache.write().await;
        *cache = Some(CachedModels::new(models.clone()));
        Ok(models)
    }

    /// Drop the cached catalog so the next listing refetches
    pub async fn clear_models_cache(&self) {
        *self.models_cache.write().await = None;
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>> {
        let policy = ExponentialBackoff {
            max_elapsed_time: Some(RETRY_BUDGET),
            ..ExponentialBackoff::default()
        };
        backoff::future::retry(policy, || self.fetch_models_once()).await
    }

    async fn fetch_models_once(
        &self,
    ) -> std::result::Result<Vec<ModelInfo>, backoff::Error<Error>> {
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .authed(self.client.get(&url))
            .timeout(self.config.models_timeout)
            .send()
            .await
            .map_err(|e| {
                let err = if e.is_timeout() {
                    Error::Timeout(self.config.models_timeout.as_secs())
                } else {
                    Error::Network(e.without_url().to_string())
                };
                backoff::Error::transient(err)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| backoff::Error::transient(Error::Network(e.without_url().to_string())))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenRouterErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.clone());
            let err = Error::Api(sanitize_api_error(&message));
            return Err(if status.is_server_error() {
                backoff::Error::transient(err)
            } else {
                backoff::Error::permanent(err)
            });
        }

        let parsed: ModelsResponse = serde_json::from_str(&text)
            .map_err(|e| backoff::Error::permanent(Error::InvalidResponse(e.to_string())))?;

        Ok(parsed.data.into_iter().map(ModelInfo::from).collect())
    }
}
