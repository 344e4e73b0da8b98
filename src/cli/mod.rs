//! CLI module
//!
//! Command-line interface for querying the CDX index.
//!
//! # Commands
//!
//! - `url` - Print the rendered request URL
//! - `check` - Probe the query with `limit=1`
//! - `fetch` - Stream every matching record, following resume keys

mod commands;
mod runner;

pub use commands::{Cli, Commands, PrintFormat, QueryArgs};
pub use runner::{apply_args, Runner};
