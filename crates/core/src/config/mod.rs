//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (VITRINA_*)
//! 2. TOML config file (if VITRINA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (VITRINA_*)
/// 2. TOML config file (if VITRINA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the external image-search service.
    ///
    /// Set via VITRINA_PEXELS_API_KEY environment variable.
    /// Required only for live searches; without it every search degrades
    /// to placeholder results.
    #[serde(default)]
    pub pexels_api_key: Option<String>,

    /// Path to the SQLite cache database.
    ///
    /// Set via VITRINA_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for outbound requests.
    ///
    /// Set via VITRINA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via VITRINA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cache capacity bound; writes beyond it evict the oldest 20%.
    ///
    /// Set via VITRINA_MAX_CACHE_ENTRIES environment variable.
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,

    /// Cache entry time-to-live in hours.
    ///
    /// Set via VITRINA_CACHE_TTL_HOURS environment variable.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Request quota assumed for a fresh rate-limit window.
    ///
    /// Set via VITRINA_HOURLY_QUOTA environment variable.
    #[serde(default = "default_hourly_quota")]
    pub hourly_quota: u32,

    /// Maximum attempts per outbound call, including the first.
    ///
    /// Set via VITRINA_MAX_RETRY_ATTEMPTS environment variable.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./vitrina-cache.sqlite")
}

fn default_user_agent() -> String {
    "vitrina/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_cache_entries() -> usize {
    100
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_hourly_quota() -> u32 {
    200
}

fn default_max_retry_attempts() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pexels_api_key: None,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_cache_entries: default_max_cache_entries(),
            cache_ttl_hours: default_cache_ttl_hours(),
            hourly_quota: default_hourly_quota(),
            max_retry_attempts: default_max_retry_attempts(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as a chrono Duration.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache_ttl_hours as i64)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `VITRINA_`
    /// 2. TOML file from `VITRINA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("VITRINA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("VITRINA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the search-service API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.pexels_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "pexels_api_key".into(),
            hint: "Set VITRINA_PEXELS_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./vitrina-cache.sqlite"));
        assert_eq!(config.user_agent, "vitrina/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_cache_entries, 100);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.hourly_quota, 200);
        assert_eq!(config.max_retry_attempts, 5);
        assert!(config.pexels_api_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_cache_ttl_duration() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_api_key_present() {
        let config = AppConfig { pexels_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }
}
