//! Injectable time source for the rate limiter.
//!
//! Backoff delays and window resets both depend on "now"; injecting the
//! clock lets retry behavior run deterministically under test.

use async_trait::async_trait;
use std::time::Duration;

/// Time source: wall-clock reads plus scheduled sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time, epoch milliseconds.
    fn now_ms(&self) -> i64;

    /// Suspend for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Real wall clock backed by chrono and tokio.
#[derive(Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Manual clock for tests: `sleep` advances `now` instead of waiting.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self { now_ms: std::sync::atomic::AtomicI64::new(now_ms) }
    }

    pub fn advance_ms(&self, delta: i64) {
        self.now_ms.fetch_add(delta, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(std::sync::atomic::Ordering::SeqCst)
    }

    async fn sleep(&self, duration: Duration) {
        self.advance_ms(duration.as_millis() as i64);
    }
}
