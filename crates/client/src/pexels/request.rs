//! Image-search API request types and validation.

use serde::{Deserialize, Serialize};

/// Search request parameters for the image-search API.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ImageSearchRequest {
    /// Search query (required).
    pub query: String,

    /// Number of results per page (1-80, default 15).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,

    /// Page number (1-indexed, default 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Photo orientation filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,

    /// Minimum photo size filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeFilter>,
}

/// Photo orientation filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

/// Minimum photo size filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeFilter {
    Large,
    Medium,
    Small,
}

impl ImageSearchRequest {
    /// Validate the search request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), crate::pexels::PexelsError> {
        use crate::pexels::PexelsError;

        if self.query.trim().is_empty() {
            return Err(PexelsError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.query.len() > 200 {
            return Err(PexelsError::InvalidQuery(format!(
                "query too long: {} chars (max 200)",
                self.query.len()
            )));
        }

        if let Some(per_page) = self.per_page
            && !(1..=80).contains(&per_page)
        {
            return Err(PexelsError::InvalidPerPage);
        }

        if let Some(page) = self.page
            && page == 0
        {
            return Err(PexelsError::InvalidPage);
        }

        Ok(())
    }

    /// Get the effective per-page count (default 15).
    pub fn get_per_page(&self) -> u8 {
        self.per_page.unwrap_or(15)
    }

    /// Get the effective page (default 1).
    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}
