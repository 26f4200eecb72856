//! Pluggable persistence for rate-limiter state.
//!
//! The limiter itself serializes access; implementations only need plain
//! load/save semantics.

use async_trait::async_trait;
use std::sync::Mutex;
use vitrina_core::cache::CacheDb;
use vitrina_core::models::RateLimitState;

/// Persisted store for the single global [`RateLimitState`].
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Load the persisted state, if any.
    async fn load(&self) -> Result<Option<RateLimitState>, vitrina_core::Error>;

    /// Overwrite the persisted state.
    async fn save(&self, state: RateLimitState) -> Result<(), vitrina_core::Error>;
}

/// In-memory store: per-process state, lost on restart.
///
/// Useful in tests and in deployments without a cache database.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<RateLimitState>>,
}

#[async_trait]
impl RateLimitStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<RateLimitState>, vitrina_core::Error> {
        match self.state.lock() {
            Ok(guard) => Ok(*guard),
            Err(poisoned) => Ok(*poisoned.into_inner()),
        }
    }

    async fn save(&self, state: RateLimitState) -> Result<(), vitrina_core::Error> {
        match self.state.lock() {
            Ok(mut guard) => *guard = Some(state),
            Err(poisoned) => *poisoned.into_inner() = Some(state),
        }
        Ok(())
    }
}

/// SQLite-backed store persisting state across processes.
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    db: CacheDb,
}

impl SqliteStateStore {
    pub fn new(db: CacheDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RateLimitStore for SqliteStateStore {
    async fn load(&self) -> Result<Option<RateLimitState>, vitrina_core::Error> {
        self.db.get_limiter_state().await
    }

    async fn save(&self, state: RateLimitState) -> Result<(), vitrina_core::Error> {
        self.db.put_limiter_state(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStateStore::default();
        assert!(store.load().await.unwrap().is_none());

        let state = RateLimitState { remaining: 7, reset_at_ms: 99 };
        store.save(state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = SqliteStateStore::new(db);

        assert!(store.load().await.unwrap().is_none());
        let state = RateLimitState { remaining: 7, reset_at_ms: 99 };
        store.save(state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(state));
    }
}
