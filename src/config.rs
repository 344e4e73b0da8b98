//! Query configuration files
//!
//! A query can be described in YAML (or JSON, which YAML accepts):
//!
//! ```yaml
//! url: example.com
//! match_type: prefix
//! fields: [timestamp, original, statuscode]
//! from: "2020-01-01"
//! cache_size: 500
//! timeout_secs: 30
//! ```
//!
//! Enumerated values are validated when the query is built, not when the
//! file is parsed, so a bad `match_type` surfaces as `InvalidParameter`.

use crate::engine::{IteratorConfig, DEFAULT_CACHE_SIZE};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_TIMEOUT};
use crate::query::{parse_timestamp, CdxQuery};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Query and engine settings loaded from a file or assembled by the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Target URL to look up
    #[serde(default)]
    pub url: Option<String>,

    /// CDX endpoint base (default: public Wayback Machine)
    #[serde(default)]
    pub base_url: Option<String>,

    /// `exact`, `prefix`, `host` or `domain`
    #[serde(default, alias = "matchType")]
    pub match_type: Option<String>,

    /// Response encoding (only `json`)
    #[serde(default)]
    pub output: Option<String>,

    /// Column projection
    #[serde(default, alias = "fl")]
    pub fields: Vec<String>,

    /// Lower time bound
    #[serde(default)]
    pub from: Option<String>,

    /// Upper time bound
    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub limit: Option<u64>,

    #[serde(default, alias = "fastLatest")]
    pub fast_latest: Option<bool>,

    #[serde(default)]
    pub offset: Option<u64>,

    /// Form-encode parameter values
    #[serde(default)]
    pub percent_encode: bool,

    /// Records per batch for paginated retrieval (falls back to `limit`)
    #[serde(default)]
    pub cache_size: Option<u64>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Client-side throttle
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl QueryConfig {
    /// Build the CDX query, validating every enumerated value
    pub fn to_query(&self) -> Result<CdxQuery> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::config("No target url given"))?;

        let mut builder = CdxQuery::builder(url).percent_encode(self.percent_encode);

        if let Some(base) = &self.base_url {
            builder = builder.base(base);
        }
        if let Some(scope) = &self.match_type {
            builder = builder.match_type(scope);
        }
        if let Some(output) = &self.output {
            builder = builder.output(output);
        }
        if !self.fields.is_empty() {
            builder = builder.fields(self.fields.iter().cloned());
        }
        if let Some(from) = &self.from {
            builder = builder.from_timestamp(parse_timestamp(from)?);
        }
        if let Some(to) = &self.to {
            builder = builder.to_timestamp(parse_timestamp(to)?);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if let Some(fast_latest) = self.fast_latest {
            builder = builder.fast_latest(fast_latest);
        }
        if let Some(offset) = self.offset {
            builder = builder.offset(offset);
        }

        builder.build()
    }

    /// HTTP settings from `timeout_secs` and `requests_per_second`
    pub fn http_config(&self) -> HttpClientConfig {
        let timeout = self.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let mut builder = HttpClientConfig::builder().timeout(timeout);
        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        builder.build()
    }

    /// Engine settings. The engine owns `limit`, so a configured `limit`
    /// sizes the batches when `cache_size` is not given.
    pub fn iterator_config(&self) -> IteratorConfig {
        let cache_size = self.cache_size.or(self.limit).unwrap_or(DEFAULT_CACHE_SIZE);
        IteratorConfig::new()
            .with_cache_size(cache_size)
            .with_http(self.http_config())
    }
}

/// Load a query config from a YAML or JSON file
pub fn load_config(path: impl AsRef<Path>) -> Result<QueryConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load a query config from a YAML or JSON string
pub fn load_config_from_str(content: &str) -> Result<QueryConfig> {
    serde_yaml::from_str(content)
        .map_err(|e| Error::config(format!("Failed to parse query config: {e}")))
}
