//! Engine types
//!
//! Configuration and statistics for the retrieval engine.

use crate::http::{HttpClientConfig, RateLimiterConfig};
use std::time::Duration;

/// Default number of records requested per batch
pub const DEFAULT_CACHE_SIZE: u64 = 100;

/// Configuration for a `CdxIterator`
#[derive(Debug, Clone)]
pub struct IteratorConfig {
    /// Records requested per batch (`limit`)
    pub cache_size: u64,
    /// HTTP client settings, including the request timeout
    pub http: HttpClientConfig,
}

impl Default for IteratorConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            http: HttpClientConfig::default(),
        }
    }
}

impl IteratorConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set records per batch
    #[must_use]
    pub fn with_cache_size(mut self, cache_size: u64) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Throttle fetches
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.http.rate_limit = Some(rate_limit);
        self
    }

    /// Replace the HTTP client settings
    #[must_use]
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Counters for one engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Successful batch fetches
    pub batches_fetched: u64,
    /// Records handed to the caller
    pub records_yielded: u64,
}

impl FetchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched batch
    pub fn add_batch(&mut self) {
        self.batches_fetched += 1;
    }

    /// Record a served record
    pub fn add_record(&mut self) {
        self.records_yielded += 1;
    }
}
