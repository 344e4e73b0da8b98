//! HTTP client module
//!
//! Provides the HTTP client used to fetch CDX batches and run probes.
//!
//! # Features
//!
//! - **Timeouts**: Per-client request timeout, surfaced as `Error::Timeout`
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Status Checks**: Non-success statuses become `Error::HttpStatus`

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_TIMEOUT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
