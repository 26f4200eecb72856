//! Never-failing image search.
//!
//! Wraps the API client and rate limiter behind an
//! availability-over-relevance policy: every path resolves to a result
//! list, degrading to placeholders when the live search is unavailable.

use crate::limiter::RateLimiter;
use crate::pexels::{ImageSearchRequest, Orientation, PexelsClient, SizeFilter};
use crate::placeholder;
use chrono::Utc;
use std::sync::Arc;
use vitrina_core::cache::key::normalize_query;
use vitrina_core::models::CachedImage;

/// Options for a search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of results to return (capped at 80 for live searches).
    pub count: usize,
    /// 1-indexed result page.
    pub page: u32,
    pub orientation: Option<Orientation>,
    pub size: Option<SizeFilter>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { count: 15, page: 1, orientation: None, size: None }
    }
}

/// Image search with graceful degradation.
pub struct SearchClient {
    client: Option<PexelsClient>,
    limiter: Arc<RateLimiter>,
    max_attempts: u32,
}

impl SearchClient {
    /// `client` is None when no credential is configured; every search
    /// then serves placeholders without touching the network.
    pub fn new(client: Option<PexelsClient>, limiter: Arc<RateLimiter>, max_attempts: u32) -> Self {
        Self { client, limiter, max_attempts }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Search the image service, resolving to placeholders on any failure.
    ///
    /// Never returns an error: missing credential, fail-fast errors, and
    /// exhausted retries all degrade to the built-in placeholder set for
    /// the query.
    pub async fn search_images(&self, query: &str, tenant_id: &str, options: &SearchOptions) -> Vec<CachedImage> {
        let Some(client) = &self.client else {
            tracing::debug!(tenant_id, "no search credential configured; serving placeholders");
            return placeholder::placeholder_set(query, tenant_id, options.count);
        };

        let req = ImageSearchRequest {
            query: query.to_string(),
            per_page: Some(options.count.clamp(1, 80) as u8),
            page: Some(options.page.max(1)),
            orientation: options.orientation,
            size: options.size,
        };

        let result = self
            .limiter
            .execute_with_retry(
                || {
                    let req = req.clone();
                    async move {
                        let outcome = client.search_page(req).await?;
                        let quota = outcome.quota;
                        Ok((outcome, quota))
                    }
                },
                self.max_attempts,
            )
            .await;

        match result {
            Ok(outcome) => {
                let activity = normalize_query(query);
                let now = Utc::now();
                tracing::debug!(tenant_id, query, results = outcome.photos.len(), "live search succeeded");
                outcome
                    .photos
                    .into_iter()
                    .map(|photo| photo.into_cached_image(tenant_id, &activity, now))
                    .collect()
            }
            Err(err) => {
                tracing::warn!(tenant_id, query, error = %err, "search degraded to placeholder results");
                placeholder::placeholder_set(query, tenant_id, options.count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::clock::ManualClock;
    use crate::limiter::{MemoryStateStore, RateLimiter};

    fn credential_less_client() -> SearchClient {
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(MemoryStateStore::default()),
            Arc::new(ManualClock::at(0)),
            200,
        ));
        SearchClient::new(None, limiter, 5)
    }

    #[tokio::test]
    async fn test_no_credential_serves_placeholder_set() {
        let client = credential_less_client();
        let options = SearchOptions { count: 4, ..Default::default() };

        let images = client.search_images("café", "7", &options).await;

        assert_eq!(images.len(), 4);
        for img in &images {
            assert!(img.is_placeholder);
            assert_eq!(img.tenant_id, "7");
            assert!(img.url.contains("pexels-photo"));
        }
    }

    #[tokio::test]
    async fn test_repeated_searches_yield_distinct_ids() {
        let client = credential_less_client();
        let options = SearchOptions { count: 2, ..Default::default() };

        let first = client.search_images("café", "7", &options).await;
        let second = client.search_images("café", "7", &options).await;

        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[1].id, second[1].id);
    }
}
