//! Shared data models for the image-acquisition subsystem.
//!
//! These types cross the crate boundary: the client produces them, the
//! cache persists them as JSON payloads, and UI consumers render them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of activities a tenant config may carry.
pub const MAX_ACTIVITIES: usize = 3;

/// Image quality tier derived from pixel dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Derive the tier from pixel count: >=1920x1080 is high,
    /// >=1280x720 is medium, everything else low.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let pixels = u64::from(width) * u64::from(height);
        if pixels >= 1920 * 1080 {
            QualityTier::High
        } else if pixels >= 1280 * 720 {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

/// A single cached image record.
///
/// Records are immutable once created: updates replace the record, never
/// mutate it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedImage {
    /// Internal id, unique across tenants and calls.
    pub id: String,
    /// Display URL.
    pub url: String,
    /// Activity tag this image was searched under.
    pub activity: String,
    /// Attribution string (photographer credit).
    pub attribution: String,
    /// Numeric id on the external service; 0 for placeholders.
    pub external_id: i64,
    pub width: u32,
    pub height: u32,
    pub cached_at: DateTime<Utc>,
    /// Owning tenant.
    pub tenant_id: String,
    /// True when synthesized locally instead of fetched.
    pub is_placeholder: bool,
    pub quality: QualityTier,
}

/// Per-tenant image configuration, replaced wholesale on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyImageConfig {
    pub tenant_id: String,
    /// Ordered activity terms, at most [`MAX_ACTIVITIES`].
    pub activities: Vec<String>,
    /// Ordered image list used for rotation.
    pub images: Vec<CachedImage>,
    pub last_updated: DateTime<Utc>,
}

/// Persisted rate-limiter accounting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitState {
    /// Remaining request quota in the current window.
    pub remaining: u32,
    /// Window reset time, epoch milliseconds.
    pub reset_at_ms: i64,
}

impl RateLimitState {
    /// A fresh full-quota window resetting one hour from `now_ms`.
    pub fn fresh(now_ms: i64, quota: u32) -> Self {
        Self { remaining: quota, reset_at_ms: now_ms + 3_600_000 }
    }

    /// Quota exhausted and the window has not reset yet.
    pub fn is_limited(&self, now_ms: i64) -> bool {
        self.remaining == 0 && now_ms < self.reset_at_ms
    }

    /// The window has passed; the state should be replaced with a fresh one.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at_ms
    }
}
