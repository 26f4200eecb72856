//! Persisted rate-limiter accounting.
//!
//! One global row, kept outside `cache_entries` so capacity eviction can
//! never discard quota state.

use super::connection::CacheDb;
use crate::Error;
use crate::models::RateLimitState;
use tokio_rusqlite::params;

impl CacheDb {
    /// Read the persisted limiter state, if any.
    pub async fn get_limiter_state(&self) -> Result<Option<RateLimitState>, Error> {
        self.conn
            .call(|conn| -> Result<Option<RateLimitState>, Error> {
                let result = conn.query_row(
                    "SELECT remaining, reset_at_ms FROM limiter_state WHERE id = 1",
                    [],
                    |row| Ok(RateLimitState { remaining: row.get(0)?, reset_at_ms: row.get(1)? }),
                );

                match result {
                    Ok(state) => Ok(Some(state)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Overwrite the persisted limiter state.
    pub async fn put_limiter_state(&self, state: RateLimitState) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO limiter_state (id, remaining, reset_at_ms)
                    VALUES (1, ?1, ?2)
                    ON CONFLICT(id) DO UPDATE SET
                        remaining = excluded.remaining,
                        reset_at_ms = excluded.reset_at_ms",
                    params![state.remaining, state.reset_at_ms],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
