//! Retrieval engine module
//!
//! Pull-based iteration over a CDX result set.
//!
//! # Overview
//!
//! The engine module provides:
//! - `CdxIterator` - owns a query, an HTTP client and the cursor state
//! - `IteratorConfig` - batch size and HTTP settings
//! - `FetchStats` - fetch and record counters
//!
//! Each `advance()` returns one record, `Ok(None)` at the end of the result
//! set, or an error. A new batch is fetched only when the cached one is used
//! up and the server handed out a resume key.

mod types;

pub use types::{FetchStats, IteratorConfig, DEFAULT_CACHE_SIZE};

use crate::decode::{decode_batch, CdxRecord, ParsedBatch};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{CursorState, Step};
use crate::query::{CdxQuery, OutputFormat, ParamValue, QueryParam};
use futures::stream::{self, Stream};
use tracing::{debug, info, warn};

/// Single-pass, memory-bounded iterator over CDX records
#[derive(Debug)]
pub struct CdxIterator {
    /// Query, rewritten before every fetch
    query: CdxQuery,
    /// HTTP client
    client: HttpClient,
    /// Cached batch and read position
    state: CursorState,
    /// Statistics
    stats: FetchStats,
}

impl CdxIterator {
    /// Create an engine with the default batch size and timeout
    pub fn new(query: CdxQuery) -> Result<Self> {
        Self::with_config(query, IteratorConfig::default())
    }

    /// Create an engine.
    ///
    /// The query is switched to `output=json` with `limit` set to the batch
    /// size, replacing any `limit` already set. `fastLatest` and `offset` are
    /// cleared.
    pub fn with_config(mut query: CdxQuery, config: IteratorConfig) -> Result<Self> {
        if config.cache_size == 0 {
            return Err(Error::config("cache_size must be at least 1"));
        }

        if let Some(limit) = query.get(QueryParam::Limit) {
            if *limit != ParamValue::Int(config.cache_size) {
                warn!("limit={} replaced by the batch size {}", limit, config.cache_size);
            }
        }
        if query.get(QueryParam::FastLatest).is_some() || query.get(QueryParam::Offset).is_some() {
            warn!("fastLatest and offset are not used with resume-key pagination, dropping them");
        }
        query.set_limits(Some(config.cache_size), None, None);
        query.set_output(Some(OutputFormat::Json));

        let client = HttpClient::with_config(config.http)?;

        Ok(Self {
            query,
            client,
            state: CursorState::new(),
            stats: FetchStats::new(),
        })
    }

    /// Get the query as it will be sent next
    pub fn query(&self) -> &CdxQuery {
        &self.query
    }

    /// Get the HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get statistics
    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    /// Check if the result set has been fully read
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Probe the configured query with `limit=1`
    pub async fn probe(&self) -> Result<bool> {
        self.query.probe(&self.client).await
    }

    /// Pull the next record.
    ///
    /// On a failed fetch the cursor does not move and the resume key stays
    /// set on the query, so calling `advance` again repeats the same request.
    pub async fn advance(&mut self) -> Result<Option<CdxRecord>> {
        loop {
            match self.state.step() {
                Step::Yield(record) => {
                    self.stats.add_record();
                    return Ok(Some(record));
                }
                Step::Done => return Ok(None),
                Step::Fetch { resume_key } => {
                    self.query.set_resume_key(Some(true), resume_key);
                    let batch = self.fetch_batch().await?;
                    self.state.load(batch);
                }
            }
        }
    }

    /// Adapt into a `Stream`, consuming the engine
    pub fn into_stream(self) -> impl Stream<Item = Result<CdxRecord>> {
        stream::try_unfold(self, |mut cursor| async move {
            let next = cursor.advance().await?;
            Ok::<_, Error>(next.map(|record| (record, cursor)))
        })
    }

    async fn fetch_batch(&mut self) -> Result<ParsedBatch> {
        let request_url = self.query.render();
        debug!("Fetching CDX batch: {}", request_url);

        let body = self.client.get_text(&request_url).await?;
        let batch = decode_batch(&body)?;
        self.stats.add_batch();

        info!(
            "Batch {}: {} rows, resume key {}",
            self.stats.batches_fetched,
            batch.num_rows(),
            if batch.has_more() { "present" } else { "absent" }
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests;
