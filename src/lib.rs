// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # wayback-cdx
//!
//! Client for the Wayback Machine CDX index that reads a whole result set
//! as one stream of records while holding a single batch in memory.
//!
//! ## Features
//!
//! - **Validated Queries**: match scope, output format and field projection
//!   are checked against the server's vocabulary before any request
//! - **Resume-Key Pagination**: batches are fetched on demand and chained
//!   through the server's resume key
//! - **Columnar Batches**: each batch is held as an Arrow `RecordBatch`
//! - **Probe**: one `limit=1` request to check a query before a long run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wayback_cdx::{CdxIterator, CdxQuery, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let query = CdxQuery::builder("example.com")
//!         .match_type("prefix")
//!         .fields(["timestamp", "original"])
//!         .build()?;
//!
//!     let mut cursor = CdxIterator::new(query)?;
//!     while let Some(record) = cursor.advance().await? {
//!         println!("{:?} {:?}", record.timestamp(), record.original());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 CdxIterator::advance()                   │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──┬──────────────┬───────────┐
//! │    Query     │   Pagination   │    Decode    │   HTTP    │
//! ├──────────────┼────────────────┼──────────────┼───────────┤
//! │ CdxQuery     │ Empty          │ JSON rows    │ Timeout   │
//! │ render()     │ Serving        │ Resume key   │ Status    │
//! │ probe()      │ Exhausted      │ RecordBatch  │ Throttle  │
//! └──────────────┴────────────────┴──────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Query construction and validation
pub mod query;

/// HTTP client
pub mod http;

/// Batch parsing
pub mod decode;

/// Resume-key cursor state machine
pub mod pagination;

/// Paginated retrieval engine
pub mod engine;

/// Query configuration files
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use decode::{CdxRecord, ParsedBatch};
pub use engine::{CdxIterator, FetchStats, IteratorConfig};
pub use error::{Error, Result};
pub use query::{CdxField, CdxQuery, MatchType, OutputFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
