//! Quota-tracking rate limiter with retry and exponential backoff.
//!
//! Tracks remaining request quota and the window reset time in a pluggable
//! persisted store, gates outbound calls, and classifies failures into
//! fail-fast and retry-with-backoff paths.
//!
//! State access is serialized behind a mutex: concurrent callers observe a
//! consistent read-modify-write, never interleaved updates.

pub mod clock;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use store::{MemoryStateStore, RateLimitStore, SqliteStateStore};

use crate::pexels::PexelsError;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use vitrina_core::models::RateLimitState;

/// Backoff delays per attempt; attempts beyond the table reuse the last entry.
const BACKOFF_MS: [i64; 5] = [1_000, 2_000, 4_000, 8_000, 16_000];

/// Default number of attempts per call, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

fn backoff_ms(attempt: u32) -> i64 {
    BACKOFF_MS[(attempt as usize).min(BACKOFF_MS.len() - 1)]
}

/// Quota accounting extracted from response headers.
#[derive(Debug, Clone, Copy)]
pub struct QuotaSnapshot {
    pub remaining: u32,
    /// Window reset, epoch milliseconds.
    pub reset_at_ms: i64,
}

/// Consumer-facing quota status.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub reset_at_ms: i64,
    pub can_make_request: bool,
    pub time_until_reset_ms: i64,
}

/// Rate limiter gating calls to the image-search service.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    quota: u32,
    lock: Mutex<()>,
}

impl RateLimiter {
    /// Create a limiter over the given store, assuming `quota` requests per
    /// fresh one-hour window.
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>, quota: u32) -> Self {
        Self { store, clock, quota, lock: Mutex::new(()) }
    }

    /// Current state; expired windows are replaced with a fresh full-quota
    /// window (reset = now + 1h) and persisted.
    pub async fn state(&self) -> Result<RateLimitState, PexelsError> {
        let _guard = self.lock.lock().await;
        self.state_locked().await
    }

    async fn state_locked(&self) -> Result<RateLimitState, PexelsError> {
        let now = self.clock.now_ms();
        match self.store.load().await? {
            Some(state) if !state.is_expired(now) => Ok(state),
            _ => {
                let fresh = RateLimitState::fresh(now, self.quota);
                self.store.save(fresh).await?;
                Ok(fresh)
            }
        }
    }

    /// Whether a request may go out right now.
    pub async fn can_proceed(&self) -> Result<bool, PexelsError> {
        let state = self.state().await?;
        let now = self.clock.now_ms();
        Ok(!state.is_limited(now) && state.remaining > 0)
    }

    /// Overwrite state from response quota headers.
    pub async fn record_response(&self, snapshot: QuotaSnapshot) -> Result<(), PexelsError> {
        let _guard = self.lock.lock().await;
        self.store
            .save(RateLimitState { remaining: snapshot.remaining, reset_at_ms: snapshot.reset_at_ms })
            .await?;
        Ok(())
    }

    async fn record_exhausted(&self, reset_at_ms: i64) -> Result<(), PexelsError> {
        let _guard = self.lock.lock().await;
        self.store.save(RateLimitState { remaining: 0, reset_at_ms }).await?;
        Ok(())
    }

    /// Consumer-facing status snapshot.
    pub async fn status(&self) -> Result<RateLimitStatus, PexelsError> {
        let state = self.state().await?;
        let now = self.clock.now_ms();
        Ok(RateLimitStatus {
            remaining: state.remaining,
            reset_at_ms: state.reset_at_ms,
            can_make_request: !state.is_limited(now) && state.remaining > 0,
            time_until_reset_ms: (state.reset_at_ms - now).max(0),
        })
    }

    /// Run `operation` with quota gating and retry.
    ///
    /// Each attempt first checks the gate: if the quota is exhausted and the
    /// window has not reset, fails immediately with
    /// [`PexelsError::QuotaExhausted`]. Failures are classified:
    ///
    /// - 429: honor `retry-after` or use twice the backoff delay, zero the
    ///   local quota until then, retry
    /// - 401/403, 404, invalid requests: fail fast, no retry
    /// - 5xx and everything else: retry with the standard backoff table
    ///
    /// Once `max_attempts` are spent, returns
    /// [`PexelsError::RetriesExhausted`] naming the last cause.
    ///
    /// The operation yields its value plus any quota headers the response
    /// carried; on success those are recorded.
    pub async fn execute_with_retry<T, F, Fut>(&self, mut operation: F, max_attempts: u32) -> Result<T, PexelsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(T, Option<QuotaSnapshot>), PexelsError>>,
    {
        let max_attempts = max_attempts.max(1);
        let mut last_err = None;

        for attempt in 0..max_attempts {
            let state = self.state().await?;
            let now = self.clock.now_ms();
            if state.is_limited(now) {
                return Err(PexelsError::QuotaExhausted { reset_at_ms: state.reset_at_ms });
            }

            match operation().await {
                Ok((value, quota)) => {
                    if let Some(snapshot) = quota {
                        self.record_response(snapshot).await?;
                    }
                    return Ok(value);
                }
                Err(PexelsError::RateLimited { retry_after_ms }) => {
                    let delay_ms = retry_after_ms.unwrap_or_else(|| backoff_ms(attempt) * 2).max(0);
                    let now = self.clock.now_ms();
                    self.record_exhausted(now + delay_ms).await?;
                    tracing::warn!(attempt, delay_ms, "rate limited by image service");
                    last_err = Some(PexelsError::RateLimited { retry_after_ms });
                    if attempt + 1 < max_attempts {
                        self.clock.sleep(Duration::from_millis(delay_ms as u64)).await;
                    }
                }
                Err(err @ PexelsError::Auth) => {
                    tracing::warn!("image service rejected credentials; not retrying");
                    return Err(err);
                }
                Err(err @ PexelsError::NotFound) => return Err(err),
                Err(
                    err @ (PexelsError::MissingApiKey
                    | PexelsError::InvalidQuery(_)
                    | PexelsError::InvalidPerPage
                    | PexelsError::InvalidPage),
                ) => return Err(err),
                Err(err) => {
                    let delay_ms = backoff_ms(attempt);
                    tracing::debug!(attempt, delay_ms, error = %err, "transient failure; backing off");
                    last_err = Some(err);
                    if attempt + 1 < max_attempts {
                        self.clock.sleep(Duration::from_millis(delay_ms as u64)).await;
                    }
                }
            }
        }

        // the loop ran at least once, so a cause was recorded
        let last = last_err.unwrap_or(PexelsError::Timeout);
        Err(PexelsError::RetriesExhausted { attempts: max_attempts, last: Box::new(last) })
    }
}

#[cfg(test)]
mod tests {
    use super::clock::ManualClock;
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn limiter_with_clock(quota: u32) -> (RateLimiter, Arc<ManualClock>, Arc<MemoryStateStore>) {
        let clock = Arc::new(ManualClock::at(0));
        let store = Arc::new(MemoryStateStore::default());
        let limiter = RateLimiter::new(store.clone(), clock.clone(), quota);
        (limiter, clock, store)
    }

    #[test]
    fn test_backoff_table_clamped() {
        assert_eq!(backoff_ms(0), 1_000);
        assert_eq!(backoff_ms(4), 16_000);
        assert_eq!(backoff_ms(9), 16_000);
    }

    #[tokio::test]
    async fn test_fresh_state_on_first_use() {
        let (limiter, _, store) = limiter_with_clock(200);

        let state = limiter.state().await.unwrap();
        assert_eq!(state.remaining, 200);
        assert_eq!(state.reset_at_ms, 3_600_000);

        // the fresh state was persisted
        assert_eq!(store.load().await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_can_proceed_iff_not_limited() {
        let (limiter, clock, _) = limiter_with_clock(200);
        assert!(limiter.can_proceed().await.unwrap());

        limiter
            .record_response(QuotaSnapshot { remaining: 0, reset_at_ms: 10_000 })
            .await
            .unwrap();
        assert!(!limiter.can_proceed().await.unwrap());

        // once the window passes, the state self-resets
        clock.advance_ms(10_000);
        assert!(limiter.can_proceed().await.unwrap());
        assert_eq!(limiter.state().await.unwrap().remaining, 200);
    }

    #[tokio::test]
    async fn test_record_response_overwrites_state() {
        let (limiter, _, store) = limiter_with_clock(200);
        limiter
            .record_response(QuotaSnapshot { remaining: 13, reset_at_ms: 777 })
            .await
            .unwrap();

        let state = store.load().await.unwrap().unwrap();
        assert_eq!(state.remaining, 13);
        assert_eq!(state.reset_at_ms, 777);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_two_rate_limits() {
        let (limiter, clock, _) = limiter_with_clock(200);
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let result = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err(PexelsError::RateLimited { retry_after_ms: None })
                        } else {
                            Ok(("ok", None))
                        }
                    }
                },
                5,
            )
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 429 delays double the backoff table: 2s then 4s
        assert_eq!(clock.now_ms(), 6_000);
    }

    #[tokio::test]
    async fn test_auth_error_fails_after_one_attempt() {
        let (limiter, _, _) = limiter_with_clock(200);
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let result: Result<(), _> = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(PexelsError::Auth)
                    }
                },
                5,
            )
            .await;

        assert!(matches!(result, Err(PexelsError::Auth)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_fails_fast() {
        let (limiter, _, _) = limiter_with_clock(200);
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let result: Result<(), _> = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(PexelsError::NotFound)
                    }
                },
                5,
            )
            .await;

        assert!(matches!(result, Err(PexelsError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let (limiter, clock, _) = limiter_with_clock(200);
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let result: Result<(), _> = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(PexelsError::Server { status: 503 })
                    }
                },
                5,
            )
            .await;

        match result {
            Err(PexelsError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 5);
                assert!(matches!(*last, PexelsError::Server { status: 503 }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // backoff 1s + 2s + 4s + 8s; no sleep after the final attempt
        assert_eq!(clock.now_ms(), 15_000);
    }

    #[tokio::test]
    async fn test_exhausted_quota_blocks_without_calling() {
        let (limiter, _, store) = limiter_with_clock(200);
        store
            .save(RateLimitState { remaining: 0, reset_at_ms: 60_000 })
            .await
            .unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        let op_calls = calls.clone();
        let result: Result<(), _> = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(((), None))
                    }
                },
                5,
            )
            .await;

        assert!(matches!(result, Err(PexelsError::QuotaExhausted { reset_at_ms: 60_000 })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_records_quota_headers() {
        let (limiter, _, store) = limiter_with_clock(200);

        let result = limiter
            .execute_with_retry(
                || async { Ok((7, Some(QuotaSnapshot { remaining: 150, reset_at_ms: 3_000_000 }))) },
                5,
            )
            .await;

        assert_eq!(result.unwrap(), 7);
        let state = store.load().await.unwrap().unwrap();
        assert_eq!(state.remaining, 150);
        assert_eq!(state.reset_at_ms, 3_000_000);
    }

    #[tokio::test]
    async fn test_retry_after_header_wins_over_backoff() {
        let (limiter, clock, _) = limiter_with_clock(200);
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let result = limiter
            .execute_with_retry(
                move || {
                    let calls = op_calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n == 0 {
                            Err(PexelsError::RateLimited { retry_after_ms: Some(30_000) })
                        } else {
                            Ok(((), None))
                        }
                    }
                },
                5,
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(clock.now_ms(), 30_000);
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let (limiter, clock, _) = limiter_with_clock(200);
        limiter
            .record_response(QuotaSnapshot { remaining: 12, reset_at_ms: 50_000 })
            .await
            .unwrap();
        clock.advance_ms(20_000);

        let status = limiter.status().await.unwrap();
        assert_eq!(status.remaining, 12);
        assert_eq!(status.reset_at_ms, 50_000);
        assert!(status.can_make_request);
        assert_eq!(status.time_until_reset_ms, 30_000);
    }
}
