//! Image-acquisition clients for vitrina.
//!
//! This crate turns product categories into ranked search terms, fetches
//! matching stock images from a Pexels-shaped API under quota gating with
//! retry, and degrades to built-in placeholder sets when the live service
//! is unavailable. [`ImageService`] is the facade consumers wire up; the
//! lower-level pieces are exported for callers that compose their own.

pub mod limiter;
pub mod mapper;
pub mod pexels;
pub mod placeholder;
pub mod search;
pub mod service;

pub use limiter::{QuotaSnapshot, RateLimitStatus, RateLimiter};
pub use mapper::{BusinessDomain, SmartMapping, map_category, smart_mapping};
pub use pexels::{ImageSearchRequest, Orientation, PexelsClient, PexelsConfig, PexelsError, SizeFilter};
pub use placeholder::placeholder_set;
pub use search::{SearchClient, SearchOptions};
pub use service::ImageService;
