//! Core types and shared functionality for vitrina.
//!
//! This crate provides:
//! - Tenant-scoped image cache with SQLite backend
//! - Shared data models (cached images, tenant image configs, limiter state)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheDb, CacheStore};
pub use config::AppConfig;
pub use error::Error;
pub use models::{CachedImage, CompanyImageConfig, QualityTier, RateLimitState};
