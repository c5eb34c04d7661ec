use std::time::Duration;

/// Configuration for [`RepositoryCachePolicy`](super::RepositoryCachePolicy).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CachePolicyOptions {
    /// Only trust a cached "all" result when its size matches the count
    /// oracle. Requires a count oracle on the policy.
    pub validate_all_cache_count: bool,
    /// Cache an empty "all" result as a zero-count marker and trust it on
    /// later reads.
    pub allow_zero_count_cache: bool,
    /// TTL applied to every cache write the policy schedules.
    pub ttl: Option<Duration>,
}

impl CachePolicyOptions {
    /// Create options with both "all" caching refinements disabled and no TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable count validation of cached "all" results.
    pub fn with_validate_all_cache_count(mut self, enabled: bool) -> Self {
        self.validate_all_cache_count = enabled;
        self
    }

    /// Enable or disable zero-count caching.
    pub fn with_allow_zero_count_cache(mut self, enabled: bool) -> Self {
        self.allow_zero_count_cache = enabled;
        self
    }

    /// Set the TTL for cache writes.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}
