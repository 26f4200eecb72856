//! Image-search API client error types.
//!
//! Variants map onto the retry policy: some fail fast (auth, not-found,
//! missing credential), some are retried with backoff, and two are
//! synthesized by the rate limiter itself (quota exhausted, retries
//! exhausted).

use std::sync::Arc;

/// Errors from the image-search API client and its rate limiter.
#[derive(Debug, thiserror::Error)]
pub enum PexelsError {
    /// No API key configured.
    #[error("missing API key: no search credential configured")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid per_page parameter (must be 1-80).
    #[error("invalid per_page: must be 1-80")]
    InvalidPerPage,

    /// Invalid page parameter (must be >= 1).
    #[error("invalid page: must be at least 1")]
    InvalidPage,

    /// Authentication failed (HTTP 401/403); never retried.
    #[error("authentication failed: credential rejected")]
    Auth,

    /// No results for this request (HTTP 404); never retried.
    #[error("no results found")]
    NotFound,

    /// Rate limited by the service (HTTP 429).
    #[error("rate limited: too many requests")]
    RateLimited {
        /// Server-suggested delay from the retry-after header, if present.
        retry_after_ms: Option<i64>,
    },

    /// Transient server error (HTTP 5xx); retried with backoff.
    #[error("server error: HTTP {status}")]
    Server { status: u16 },

    /// Unexpected HTTP status outside the classified ranges.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Local quota is exhausted and the window has not reset.
    #[error("quota exhausted until epoch {reset_at_ms}ms")]
    QuotaExhausted { reset_at_ms: i64 },

    /// All retry attempts failed; carries the last underlying cause.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<PexelsError> },

    /// Rate-limiter state store failed.
    #[error("state store error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for PexelsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PexelsError::Timeout } else { PexelsError::Network(Arc::new(err)) }
    }
}

impl From<vitrina_core::Error> for PexelsError {
    fn from(err: vitrina_core::Error) -> Self {
        PexelsError::Store(err.to_string())
    }
}
