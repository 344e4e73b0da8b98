//! Query module
//!
//! Builds CDX request URLs from a target URL and a closed set of optional
//! parameters.
//!
//! # Overview
//!
//! - `CdxQuery` - validated parameter set with `render()` and `probe()`
//! - `CdxQueryBuilder` - string-accepting builder, validation at `build()`
//! - Vocabulary enums: `MatchType`, `OutputFormat`, `CdxField`, `QueryParam`

mod builder;
mod types;

pub use builder::{construct, CdxQuery, CdxQueryBuilder, QueryParams, DEFAULT_BASE_URL};
pub use types::{
    parse_timestamp, validate, CdxField, MatchType, OutputFormat, ParamValue, QueryParam,
    TIMESTAMP_FORMAT,
};
