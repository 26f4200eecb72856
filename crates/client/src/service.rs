//! Consumer-facing image service.
//!
//! The facade UI collaborators call: cache-first search, tenant config
//! load/save, image rotation, and quota status. Search never surfaces an
//! error; config and cache operations do, since their callers can retry.

use crate::limiter::{RateLimitStatus, RateLimiter, SqliteStateStore, SystemClock};
use crate::pexels::{PexelsClient, PexelsConfig};
use crate::search::{SearchClient, SearchOptions};
use std::sync::Arc;
use vitrina_core::cache::{CacheDb, CacheStore};
use vitrina_core::models::{CachedImage, CompanyImageConfig};
use vitrina_core::{AppConfig, Error};

/// Image-acquisition service for UI consumers.
pub struct ImageService {
    search: SearchClient,
    cache: CacheStore,
    limiter: Arc<RateLimiter>,
}

impl ImageService {
    /// Open the cache database from config and assemble the service.
    pub async fn connect(config: &AppConfig) -> Result<Self, Error> {
        let db = CacheDb::open(&config.db_path).await?;
        Ok(Self::with_db(config, db))
    }

    /// Assemble the service over an already-open database.
    pub fn with_db(config: &AppConfig, db: CacheDb) -> Self {
        let cache = CacheStore::new(db.clone(), config.cache_ttl(), config.max_cache_entries);
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(SqliteStateStore::new(db)),
            Arc::new(SystemClock),
            config.hourly_quota,
        ));

        let client = if config.pexels_api_key.is_none() {
            tracing::debug!("no image-service credential configured; searches will serve placeholders");
            None
        } else {
            match PexelsConfig::from_app(config).and_then(PexelsClient::new) {
                Ok(client) => Some(client),
                Err(err) => {
                    tracing::warn!(error = %err, "search client unavailable; searches will serve placeholders");
                    None
                }
            }
        };

        let search = SearchClient::new(client, limiter.clone(), config.max_retry_attempts);
        Self { search, cache, limiter }
    }

    /// Search for images, consulting the per-(tenant, query) cache first.
    ///
    /// Live results are cached; placeholder sets are not, so a transient
    /// outage never pins degraded results for the full TTL.
    pub async fn search(&self, query: &str, tenant_id: &str, options: &SearchOptions) -> Vec<CachedImage> {
        match self.cache.load_search_results(tenant_id, query).await {
            Ok(Some(images)) => {
                tracing::debug!(tenant_id, query, "search cache hit");
                return images;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "search cache read failed; falling through to live search");
            }
        }

        let images = self.search.search_images(query, tenant_id, options).await;

        let genuine = !images.is_empty() && images.iter().all(|img| !img.is_placeholder);
        if genuine && let Err(err) = self.cache.save_search_results(tenant_id, query, &images).await {
            tracing::warn!(error = %err, "failed to cache search results");
        }

        images
    }

    /// Load a tenant's image config.
    pub async fn config(&self, tenant_id: &str) -> Result<Option<CompanyImageConfig>, Error> {
        self.cache.load_config(tenant_id).await
    }

    /// Save a tenant's image config, replacing any previous one.
    pub async fn save_config(&self, config: &CompanyImageConfig) -> Result<(), Error> {
        self.cache.save_config(config).await
    }

    /// Rotate through the tenant's configured images by index.
    pub async fn random_image(&self, tenant_id: &str, index: usize) -> Result<Option<String>, Error> {
        self.cache.get_random_image(tenant_id, index).await
    }

    /// Tenant images matching an activity tag.
    pub async fn images_by_activity(&self, tenant_id: &str, activity: &str) -> Result<Vec<CachedImage>, Error> {
        self.cache.get_images_by_activity(tenant_id, activity).await
    }

    /// Drop all cached data for a tenant.
    pub async fn clear_tenant(&self, tenant_id: &str) -> Result<u64, Error> {
        self.cache.clear_tenant(tenant_id).await
    }

    /// Current quota status for operator dashboards.
    pub async fn rate_limit_status(&self) -> Result<RateLimitStatus, crate::pexels::PexelsError> {
        self.limiter.status().await
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }
}
