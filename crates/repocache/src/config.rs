use std::{env, time::Duration};

use repocache_core::policy::CachePolicyOptions;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Trust a cached "all" result only when it matches the repository count (default: false)
    pub validate_all_count: bool,
    /// Cache empty "all" results as a zero-count marker (default: true)
    pub allow_zero_count: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_VALIDATE_ALL_COUNT` - Validate cached "all" results (default: false)
    /// - `CACHE_ALLOW_ZERO_COUNT` - Cache empty "all" results (default: true)
    ///
    /// Unparseable values fall back to the default. A zero entry limit is
    /// raised to one.
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000usize)
                .max(1),
            validate_all_count: env::var("CACHE_VALIDATE_ALL_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            allow_zero_count: env::var("CACHE_ALLOW_ZERO_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Build the cache policy options for repositories.
    pub fn policy_options(&self) -> CachePolicyOptions {
        CachePolicyOptions::new()
            .with_validate_all_cache_count(self.validate_all_count)
            .with_allow_zero_count_cache(self.allow_zero_count)
            .with_ttl(self.cache_ttl())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
