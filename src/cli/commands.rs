//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Wayback Machine CDX client
#[derive(Parser, Debug)]
#[command(name = "wayback-cdx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Query configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the rendered CDX request URL
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Check that the query is accepted by the server (limit=1 request)
    Check {
        #[command(flatten)]
        query: QueryArgs,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Fetch every matching record, following resume keys
    Fetch {
        #[command(flatten)]
        query: QueryArgs,

        /// Records requested per batch
        #[arg(long)]
        cache_size: Option<u64>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Client-side throttle in requests per second
        #[arg(long)]
        requests_per_second: Option<u32>,

        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: PrintFormat,
    },
}

/// Query parameters shared by every command. Flags override the config file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// URL to look up in the index
    pub url: Option<String>,

    /// CDX endpoint base (default: http://web.archive.org/cdx/search)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Match scope: exact, prefix, host, domain
    #[arg(short, long)]
    pub match_type: Option<String>,

    /// Columns to return (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Lower time bound (YYYYMMDDHHMMSS or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Upper time bound (YYYYMMDDHHMMSS or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Maximum rows per request
    #[arg(long)]
    pub limit: Option<u64>,

    /// Rows to skip
    #[arg(long)]
    pub offset: Option<u64>,

    /// Ask the server for its fast path to the latest captures
    #[arg(long)]
    pub fast_latest: bool,

    /// Form-encode parameter values
    #[arg(long)]
    pub encode: bool,
}

/// How fetched records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PrintFormat {
    /// One JSON object per line
    Json,
    /// Space-separated values, like the server's plain text output
    Pretty,
}
