//! Tenant-scoped cache operations.
//!
//! Entries carry a write timestamp; expiry is checked on read (stale rows
//! are deleted and reported as absent) and capacity is enforced after each
//! write by evicting the oldest 20% of entries.

use super::connection::CacheDb;
use super::key;
use crate::Error;
use crate::models::{CachedImage, CompanyImageConfig, MAX_ACTIVITIES};
use chrono::{Duration, Utc};
use tokio_rusqlite::params;

const KIND_CONFIG: &str = "config";
const KIND_SEARCH: &str = "search";

/// Tenant-scoped cache with TTL and a capacity bound.
#[derive(Clone, Debug)]
pub struct CacheStore {
    db: CacheDb,
    ttl: Duration,
    max_entries: usize,
}

impl CacheStore {
    /// Create a store over an open database with the given expiry policy.
    pub fn new(db: CacheDb, ttl: Duration, max_entries: usize) -> Self {
        Self { db, ttl, max_entries }
    }

    /// Shared handle to the underlying database.
    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    /// Save a tenant's image config, replacing any previous one.
    ///
    /// Activities beyond [`MAX_ACTIVITIES`] are dropped.
    pub async fn save_config(&self, config: &CompanyImageConfig) -> Result<(), Error> {
        if config.tenant_id.is_empty() {
            return Err(Error::InvalidInput("tenant id cannot be empty".into()));
        }

        let mut config = config.clone();
        if config.activities.len() > MAX_ACTIVITIES {
            tracing::warn!(
                tenant_id = %config.tenant_id,
                dropped = config.activities.len() - MAX_ACTIVITIES,
                "config carries more than {MAX_ACTIVITIES} activities; truncating"
            );
            config.activities.truncate(MAX_ACTIVITIES);
        }

        let payload = serde_json::to_string(&config)?;
        self.put_entry(&key::config_key(&config.tenant_id), KIND_CONFIG, &config.tenant_id, &payload)
            .await
    }

    /// Load a tenant's image config, or None if absent or expired.
    pub async fn load_config(&self, tenant_id: &str) -> Result<Option<CompanyImageConfig>, Error> {
        match self.get_entry(&key::config_key(tenant_id)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Cache a search-result set under (tenant, normalized query).
    pub async fn save_search_results(
        &self, tenant_id: &str, query: &str, images: &[CachedImage],
    ) -> Result<(), Error> {
        if tenant_id.is_empty() {
            return Err(Error::InvalidInput("tenant id cannot be empty".into()));
        }

        let payload = serde_json::to_string(images)?;
        self.put_entry(&key::search_key(tenant_id, query), KIND_SEARCH, tenant_id, &payload)
            .await
    }

    /// Load a cached search-result set, or None if absent or expired.
    pub async fn load_search_results(
        &self, tenant_id: &str, query: &str,
    ) -> Result<Option<Vec<CachedImage>>, Error> {
        match self.get_entry(&key::search_key(tenant_id, query)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Rotate through a tenant's configured images by index.
    ///
    /// Returns the URL at `index mod images.len()`, or None if the tenant
    /// has no config or an empty image list.
    pub async fn get_random_image(&self, tenant_id: &str, index: usize) -> Result<Option<String>, Error> {
        let Some(config) = self.load_config(tenant_id).await? else {
            return Ok(None);
        };
        if config.images.is_empty() {
            return Ok(None);
        }
        Ok(Some(config.images[index % config.images.len()].url.clone()))
    }

    /// All of a tenant's configured images whose activity tag matches
    /// (case-insensitive exact match).
    pub async fn get_images_by_activity(
        &self, tenant_id: &str, activity: &str,
    ) -> Result<Vec<CachedImage>, Error> {
        let Some(config) = self.load_config(tenant_id).await? else {
            return Ok(Vec::new());
        };
        let wanted = activity.to_lowercase();
        Ok(config
            .images
            .into_iter()
            .filter(|img| img.activity.to_lowercase() == wanted)
            .collect())
    }

    /// Remove every cache entry belonging to the tenant.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_tenant(&self, tenant_id: &str) -> Result<u64, Error> {
        let tenant_id = tenant_id.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE tenant_id = ?1", params![tenant_id])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries older than the TTL.
    ///
    /// Expiry is also checked on every read; this sweep exists for
    /// explicit maintenance. Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let cutoff = (Utc::now() - self.ttl).to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE cached_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Evict the oldest 20% of entries once the capacity bound is exceeded.
    ///
    /// Ordering is by write time, not access time. Returns the number of
    /// evicted entries.
    pub async fn enforce_capacity(&self) -> Result<u64, Error> {
        let max = self.max_entries as i64;
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_evict = (count / 5).max(1);
                let deleted = conn.execute(
                    "DELETE FROM cache_entries WHERE key_hash IN (
                        SELECT key_hash FROM cache_entries ORDER BY cached_at ASC LIMIT ?1
                    )",
                    params![to_evict],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Total entries currently in the cache.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.db
            .conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn put_entry(&self, key_hash: &str, kind: &str, tenant_id: &str, payload: &str) -> Result<(), Error> {
        let key_hash = key_hash.to_string();
        let kind = kind.to_string();
        let tenant_id = tenant_id.to_string();
        let payload = payload.to_string();
        let cached_at = Utc::now().to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (key_hash, kind, tenant_id, payload, cached_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        kind = excluded.kind,
                        tenant_id = excluded.tenant_id,
                        payload = excluded.payload,
                        cached_at = excluded.cached_at",
                    params![key_hash, kind, tenant_id, payload, cached_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        self.enforce_capacity().await?;
        Ok(())
    }

    async fn get_entry(&self, key_hash: &str) -> Result<Option<String>, Error> {
        let key_hash = key_hash.to_string();
        let cutoff = (Utc::now() - self.ttl).to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT payload, cached_at FROM cache_entries WHERE key_hash = ?1")?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                });

                match result {
                    Ok((payload, cached_at)) => {
                        // RFC3339 UTC timestamps compare lexicographically.
                        if cached_at < cutoff {
                            conn.execute("DELETE FROM cache_entries WHERE key_hash = ?1", params![key_hash])?;
                            Ok(None)
                        } else {
                            Ok(Some(payload))
                        }
                    }
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QualityTier;

    fn make_image(tenant_id: &str, activity: &str, n: usize) -> CachedImage {
        CachedImage {
            id: format!("img-{tenant_id}-{n}"),
            url: format!("https://images.example.com/{n}.jpeg"),
            activity: activity.to_string(),
            attribution: "Test Photographer".to_string(),
            external_id: n as i64,
            width: 1280,
            height: 720,
            cached_at: Utc::now(),
            tenant_id: tenant_id.to_string(),
            is_placeholder: false,
            quality: QualityTier::Medium,
        }
    }

    fn make_config(tenant_id: &str, activities: &[&str], image_count: usize) -> CompanyImageConfig {
        CompanyImageConfig {
            tenant_id: tenant_id.to_string(),
            activities: activities.iter().map(|a| a.to_string()).collect(),
            images: (0..image_count).map(|n| make_image(tenant_id, "café", n)).collect(),
            last_updated: Utc::now(),
        }
    }

    async fn day_store() -> CacheStore {
        CacheStore::new(CacheDb::open_in_memory().await.unwrap(), Duration::hours(24), 100)
    }

    #[tokio::test]
    async fn test_save_and_load_config() {
        let store = day_store().await;
        let config = make_config("7", &["café", "coffee"], 2);

        store.save_config(&config).await.unwrap();
        let loaded = store.load_config("7").await.unwrap().unwrap();

        assert_eq!(loaded.activities, config.activities);
        assert_eq!(loaded.images, config.images);
    }

    #[tokio::test]
    async fn test_load_missing_config() {
        let store = day_store().await;
        assert!(store.load_config("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_config_replaced_wholesale() {
        let store = day_store().await;
        store.save_config(&make_config("7", &["café"], 3)).await.unwrap();
        store.save_config(&make_config("7", &["panadería"], 1)).await.unwrap();

        let loaded = store.load_config("7").await.unwrap().unwrap();
        assert_eq!(loaded.activities, vec!["panadería"]);
        assert_eq!(loaded.images.len(), 1);
    }

    #[tokio::test]
    async fn test_save_config_truncates_activities() {
        let store = day_store().await;
        let config = make_config("7", &["a", "b", "c", "d", "e"], 0);

        store.save_config(&config).await.unwrap();
        let loaded = store.load_config("7").await.unwrap().unwrap();
        assert_eq!(loaded.activities, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_save_config_empty_tenant_rejected() {
        let store = day_store().await;
        let config = make_config("", &["café"], 0);
        assert!(matches!(store.save_config(&config).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_config_expires_and_is_purged() {
        let store = CacheStore::new(CacheDb::open_in_memory().await.unwrap(), Duration::seconds(1), 100);
        store.save_config(&make_config("7", &["café"], 1)).await.unwrap();

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        assert!(store.load_config("7").await.unwrap().is_none());
        // purge-on-read deleted the row, not just hid it
        assert_eq!(store.entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_and_load_search_results() {
        let store = day_store().await;
        let images = vec![make_image("7", "café", 0), make_image("7", "café", 1)];

        store.save_search_results("7", "  Café ", &images).await.unwrap();

        // normalized query shares the entry
        let loaded = store.load_search_results("7", "café").await.unwrap().unwrap();
        assert_eq!(loaded, images);

        // other tenants don't see it
        assert!(store.load_search_results("8", "café").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_results_expire() {
        let store = CacheStore::new(CacheDb::open_in_memory().await.unwrap(), Duration::seconds(1), 100);
        store
            .save_search_results("7", "café", &[make_image("7", "café", 0)])
            .await
            .unwrap();

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        assert!(store.load_search_results("7", "café").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_random_image_rotation_is_periodic() {
        let store = day_store().await;
        store.save_config(&make_config("7", &["café"], 3)).await.unwrap();

        for i in 0..6 {
            let a = store.get_random_image("7", i).await.unwrap();
            let b = store.get_random_image("7", i + 3).await.unwrap();
            let c = store.get_random_image("7", i + 9).await.unwrap();
            assert!(a.is_some());
            assert_eq!(a, b);
            assert_eq!(a, c);
        }
    }

    #[tokio::test]
    async fn test_random_image_empty_cases() {
        let store = day_store().await;
        assert!(store.get_random_image("7", 0).await.unwrap().is_none());

        store.save_config(&make_config("7", &["café"], 0)).await.unwrap();
        assert!(store.get_random_image("7", 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_images_by_activity_case_insensitive() {
        let store = day_store().await;
        let mut config = make_config("7", &["café"], 2);
        config.images[1].activity = "Restaurante".to_string();
        store.save_config(&config).await.unwrap();

        let cafe = store.get_images_by_activity("7", "CAFÉ").await.unwrap();
        assert_eq!(cafe.len(), 1);
        assert_eq!(cafe[0].activity, "café");

        let restaurant = store.get_images_by_activity("7", "restaurante").await.unwrap();
        assert_eq!(restaurant.len(), 1);

        assert!(store.get_images_by_activity("7", "farmacia").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_tenant_only_touches_tenant() {
        let store = day_store().await;
        store.save_config(&make_config("7", &["café"], 1)).await.unwrap();
        store.save_search_results("7", "café", &[]).await.unwrap();
        store.save_config(&make_config("8", &["ropa"], 1)).await.unwrap();

        let deleted = store.clear_tenant("7").await.unwrap();
        assert_eq!(deleted, 2);

        assert!(store.load_config("7").await.unwrap().is_none());
        assert!(store.load_config("8").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_fifth() {
        let store = CacheStore::new(CacheDb::open_in_memory().await.unwrap(), Duration::hours(24), 10);

        for n in 0..11 {
            store
                .save_search_results("7", &format!("query {n}"), &[])
                .await
                .unwrap();
        }

        // 11 entries breach the bound of 10; the oldest 20% (2) are evicted
        assert_eq!(store.entry_count().await.unwrap(), 9);
        assert!(store.load_search_results("7", "query 0").await.unwrap().is_none());
        assert!(store.load_search_results("7", "query 10").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_expired_sweep() {
        let store = CacheStore::new(CacheDb::open_in_memory().await.unwrap(), Duration::seconds(1), 100);
        store.save_search_results("7", "old", &[]).await.unwrap();

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        store.save_search_results("7", "new", &[]).await.unwrap();

        let deleted = store.purge_expired().await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.entry_count().await.unwrap(), 1);
    }
}
