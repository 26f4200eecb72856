//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_cache_entries` is 0
    /// - `cache_ttl_hours` is 0 or exceeds one week
    /// - `hourly_quota` is 0
    /// - `max_retry_attempts` is 0 or exceeds 10
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_cache_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "max_cache_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.cache_ttl_hours == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_hours > 168 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: "must not exceed one week (168 hours)".into(),
            });
        }

        if self.hourly_quota == 0 {
            return Err(ConfigError::Invalid { field: "hourly_quota".into(), reason: "must be greater than 0".into() });
        }

        if self.max_retry_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_retry_attempts".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_retry_attempts > 10 {
            return Err(ConfigError::Invalid {
                field: "max_retry_attempts".into(),
                reason: "must not exceed 10".into(),
            });
        }

        if self.pexels_api_key.is_none() {
            tracing::warn!("no search API key configured; searches will return placeholder images");
        }

        Ok(())
    }
}
