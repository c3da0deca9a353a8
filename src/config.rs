//! Configuration Module
//!
//! `OptimizerConfig` is what the library needs at construction time.
//! `Config` wraps it for the admin server binary and loads it from
//! environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

// == Optimizer Config ==
/// Construction parameters for a `QueryOptimizer`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Maximum number of cached results
    pub max_entries: usize,
    /// TTL in seconds used when a query does not name one
    pub default_ttl: u64,
    /// TTL in seconds for paginated results
    pub pagination_ttl: u64,
    /// Number of query metrics retained
    pub max_metrics: usize,
    /// Queries slower than this are reported as slow
    pub slow_query_threshold_ms: f64,
}

impl OptimizerConfig {
    /// Rejects values that would make the cache pathological.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfiguration(
                "max_entries must be positive".to_string(),
            ));
        }
        if self.max_metrics == 0 {
            return Err(CacheError::InvalidConfiguration(
                "max_metrics must be positive".to_string(),
            ));
        }
        if self.default_ttl == 0 || self.pagination_ttl == 0 {
            return Err(CacheError::InvalidConfiguration(
                "TTL values must be positive".to_string(),
            ));
        }
        if self.slow_query_threshold_ms.is_nan() || self.slow_query_threshold_ms < 0.0 {
            return Err(CacheError::InvalidConfiguration(
                "slow_query_threshold_ms must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            pagination_ttl: 60,
            max_metrics: 1000,
            slow_query_threshold_ms: 1000.0,
        }
    }
}

// == Server Config ==
/// Admin server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub optimizer: OptimizerConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `PAGINATION_TTL` - TTL for paginated results in seconds (default: 60)
    /// - `MAX_METRICS` - Retained query metrics (default: 1000)
    /// - `SLOW_QUERY_THRESHOLD_MS` - Slow query threshold (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = OptimizerConfig::default();

        Self {
            optimizer: OptimizerConfig {
                max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
                default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
                pagination_ttl: env_or("PAGINATION_TTL", defaults.pagination_ttl),
                max_metrics: env_or("MAX_METRICS", defaults.max_metrics),
                slow_query_threshold_ms: env_or(
                    "SLOW_QUERY_THRESHOLD_MS",
                    defaults.slow_query_threshold_ms,
                ),
            },
            server_port: env_or("SERVER_PORT", 3000),
            cleanup_interval: env_or("CLEANUP_INTERVAL", 1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            optimizer: OptimizerConfig::default(),
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
