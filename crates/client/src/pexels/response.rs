//! Image-search API response types and normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use vitrina_core::models::{CachedImage, QualityTier};

/// Raw response from the image-search API.
#[derive(Debug, Deserialize)]
pub struct PexelsApiResponse {
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

/// Individual photo record from the API.
#[derive(Debug, Deserialize)]
pub struct RawPhoto {
    pub id: i64,
    /// Photo page URL; used as a fallback when no rendition is present.
    pub url: String,
    pub photographer: String,
    #[serde(default)]
    pub src: PhotoSrc,
    pub width: u32,
    pub height: u32,
}

/// Pre-rendered image URLs by size.
#[derive(Debug, Default, Deserialize)]
pub struct PhotoSrc {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

impl RawPhoto {
    /// Convert a raw photo record into a cached image for the given tenant.
    pub fn into_cached_image(self, tenant_id: &str, activity: &str, cached_at: DateTime<Utc>) -> CachedImage {
        let quality = QualityTier::from_dimensions(self.width, self.height);
        let url = self
            .src
            .large
            .or(self.src.original)
            .or(self.src.medium)
            .unwrap_or(self.url);

        CachedImage {
            id: format!("px-{}-{}", tenant_id, self.id),
            url,
            activity: activity.to_string(),
            attribution: self.photographer,
            external_id: self.id,
            width: self.width,
            height: self.height,
            cached_at,
            tenant_id: tenant_id.to_string(),
            is_placeholder: false,
            quality,
        }
    }
}
