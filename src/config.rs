//! Configuration Module
//!
//! Handles loading cache and datastore configuration from environment variables.

use std::env;

/// Data-access layer configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries each domain cache can hold
    pub max_entries: usize,
    /// Per-entry size cap in serialized bytes; values above it are not cached
    pub max_value_bytes: usize,
    /// Whether an expired entry may be served one final time before refresh
    pub allow_stale: bool,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Base URL of the hosted Postgres REST API
    pub database_url: String,
    /// Optional API key sent with every datastore request
    pub database_api_key: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum entries per domain cache (default: 1000)
    /// - `CACHE_MAX_VALUE_BYTES` - Per-entry size cap in bytes (default: 262144)
    /// - `CACHE_ALLOW_STALE` - Serve expired entries once before refresh (default: false)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `DATABASE_URL` - Base URL of the Postgres REST API (default: http://localhost:3000)
    /// - `DATABASE_API_KEY` - API key for the datastore (default: unset)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            max_value_bytes: env::var("CACHE_MAX_VALUE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256 * 1024),
            allow_stale: env::var("CACHE_ALLOW_STALE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            database_api_key: env::var("DATABASE_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_value_bytes: 256 * 1024,
            allow_stale: false,
            sweep_interval: 30,
            database_url: "http://localhost:3000".to_string(),
            database_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.max_value_bytes, 256 * 1024);
        assert!(!config.allow_stale);
        assert_eq!(config.sweep_interval, 30);
        assert_eq!(config.database_url, "http://localhost:3000");
        assert!(config.database_api_key.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_MAX_VALUE_BYTES");
        env::remove_var("CACHE_ALLOW_STALE");
        env::remove_var("CACHE_SWEEP_INTERVAL");
        env::remove_var("DATABASE_URL");
        env::remove_var("DATABASE_API_KEY");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.sweep_interval, 30);
        assert_eq!(config.database_url, "http://localhost:3000");
    }
}
