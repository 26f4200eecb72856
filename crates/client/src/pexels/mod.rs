//! Image-search API client.
//!
//! Provides a client for a Pexels-shaped image-search service with request
//! validation, response normalization, and rate-limit header extraction.
//!
//! ### Service contract
//!
//! - **Endpoint**: `https://api.pexels.com/v1/search`
//! - **Authentication**: API key in the `Authorization` header.
//! - **Rate-limit signals**: `x-ratelimit-remaining` and `x-ratelimit-reset`
//!   (epoch seconds) on every response; `retry-after` on HTTP 429.
//! - **Normalization**: photo records map to [`CachedImage`] with a quality
//!   tier derived from pixel dimensions.
//!
//! The client performs a single request per call; quota gating and retry
//! live in [`crate::limiter`].
//!
//! [`CachedImage`]: vitrina_core::models::CachedImage

pub mod error;
pub mod request;
pub mod response;

pub use error::PexelsError;
pub use request::{ImageSearchRequest, Orientation, SizeFilter};
pub use response::{PexelsApiResponse, PhotoSrc, RawPhoto};

use crate::limiter::QuotaSnapshot;
use reqwest::header::{self, HeaderMap};
use std::sync::Arc;
use std::time::Duration;
use vitrina_core::AppConfig;

/// Default base URL for the image-search API.
const DEFAULT_BASE_URL: &str = "https://api.pexels.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "vitrina/0.1";

/// Image-search API client configuration.
#[derive(Debug, Clone)]
pub struct PexelsConfig {
    /// API key sent in the Authorization header.
    pub api_key: String,
    /// Base URL (default: https://api.pexels.com/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PexelsConfig {
    /// Build a client config from the application config.
    ///
    /// Returns [`PexelsError::MissingApiKey`] if no credential is set.
    pub fn from_app(config: &AppConfig) -> Result<Self, PexelsError> {
        let api_key = config
            .require_api_key()
            .map_err(|_| PexelsError::MissingApiKey)?
            .to_string();

        Ok(Self {
            api_key,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            ..Default::default()
        })
    }
}

/// One page of raw search results plus the quota headers that came with it.
#[derive(Debug)]
pub struct SearchOutcome {
    pub photos: Vec<RawPhoto>,
    pub total_results: u64,
    pub quota: Option<QuotaSnapshot>,
}

/// Image-search API client.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    http: reqwest::Client,
    config: PexelsConfig,
}

impl PexelsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PexelsConfig) -> Result<Self, PexelsError> {
        if config.api_key.is_empty() {
            return Err(PexelsError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PexelsError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Execute a single search request.
    ///
    /// Classifies the HTTP status into the error taxonomy and extracts
    /// rate-limit headers; no retries happen at this layer.
    pub async fn search_page(&self, req: ImageSearchRequest) -> Result<SearchOutcome, PexelsError> {
        req.validate()?;

        let url = format!("{}/search", self.config.base_url);

        tracing::debug!(query = %req.query, page = req.get_page(), "searching image service");

        let http_response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&req)
            .send()
            .await
            .map_err(PexelsError::from)?;

        let status = http_response.status().as_u16();
        let quota = parse_quota(http_response.headers());

        tracing::debug!(status, remaining = quota.as_ref().map(|q| q.remaining), "image service response");

        match status {
            401 | 403 => return Err(PexelsError::Auth),
            404 => return Err(PexelsError::NotFound),
            429 => {
                return Err(PexelsError::RateLimited { retry_after_ms: parse_retry_after(http_response.headers()) });
            }
            s if s >= 500 => return Err(PexelsError::Server { status: s }),
            s if s >= 400 => return Err(PexelsError::Http { status: s }),
            _ => {}
        }

        let bytes = http_response.bytes().await.map_err(PexelsError::from)?;
        let api_response: PexelsApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| PexelsError::Parse(e.to_string()))?;

        Ok(SearchOutcome { photos: api_response.photos, total_results: api_response.total_results, quota })
    }
}

/// Extract quota accounting from response headers, if present.
fn parse_quota(headers: &HeaderMap) -> Option<QuotaSnapshot> {
    let remaining: u32 = headers.get("x-ratelimit-remaining")?.to_str().ok()?.trim().parse().ok()?;
    let reset_s: i64 = headers.get("x-ratelimit-reset")?.to_str().ok()?.trim().parse().ok()?;
    Some(QuotaSnapshot { remaining, reset_at_ms: reset_s * 1000 })
}

/// Extract the retry-after header (seconds) as milliseconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<i64> {
    let secs: i64 = headers.get("retry-after")?.to_str().ok()?.trim().parse().ok()?;
    Some(secs * 1000)
}
