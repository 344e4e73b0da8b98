//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, PrintFormat, QueryArgs};
use crate::config::{load_config, QueryConfig};
use crate::engine::CdxIterator;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde_json::json;
use std::io::{self, Write};
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Url { query } => self.url(query),
            Commands::Check { query, timeout } => self.check(query, *timeout).await,
            Commands::Fetch {
                query,
                cache_size,
                timeout,
                requests_per_second,
                max_records,
                format,
            } => {
                let mut config = self.resolve(query)?;
                config.cache_size = cache_size.or(config.cache_size);
                config.timeout_secs = timeout.or(config.timeout_secs);
                config.requests_per_second = requests_per_second.or(config.requests_per_second);
                self.fetch(&config, *max_records, *format).await
            }
        }
    }

    /// Config file (if any) with command-line flags applied on top
    fn resolve(&self, args: &QueryArgs) -> Result<QueryConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => QueryConfig::default(),
        };
        apply_args(&mut config, args);
        Ok(config)
    }

    fn url(&self, args: &QueryArgs) -> Result<()> {
        let query = self.resolve(args)?.to_query()?;
        println!("{}", query.render());
        Ok(())
    }

    async fn check(&self, args: &QueryArgs, timeout: Option<u64>) -> Result<()> {
        let mut config = self.resolve(args)?;
        config.timeout_secs = timeout.or(config.timeout_secs);

        let query = config.to_query()?;
        let client = HttpClient::with_config(config.http_config())?;
        let ok = query.probe(&client).await?;

        let status = if ok { "SUCCEEDED" } else { "FAILED" };
        println!(
            "{}",
            json!({
                "status": status,
                "url": query.url(),
            })
        );

        if ok {
            Ok(())
        } else {
            Err(Error::Other(format!(
                "CDX server rejected query for '{}'",
                query.url()
            )))
        }
    }

    async fn fetch(
        &self,
        config: &QueryConfig,
        max_records: Option<usize>,
        format: PrintFormat,
    ) -> Result<()> {
        let start = Instant::now();
        let query = config.to_query()?;
        let mut cursor = CdxIterator::with_config(query, config.iterator_config())?;

        let mut out = io::stdout();
        let mut printed = 0usize;

        while !max_records.is_some_and(|max| printed >= max) {
            let Some(record) = cursor.advance().await? else {
                break;
            };

            match format {
                PrintFormat::Json => writeln!(out, "{}", serde_json::to_string(&record)?)?,
                PrintFormat::Pretty => writeln!(out, "{}", record.values().join(" "))?,
            }
            printed += 1;
        }
        out.flush()?;

        let stats = cursor.stats();
        info!(
            "Fetched {} records in {} batches ({:?})",
            stats.records_yielded,
            stats.batches_fetched,
            start.elapsed()
        );
        Ok(())
    }
}

/// Overlay command-line flags on a config
pub fn apply_args(config: &mut QueryConfig, args: &QueryArgs) {
    if args.url.is_some() {
        config.url.clone_from(&args.url);
    }
    if args.base_url.is_some() {
        config.base_url.clone_from(&args.base_url);
    }
    if args.match_type.is_some() {
        config.match_type.clone_from(&args.match_type);
    }
    if !args.fields.is_empty() {
        config.fields.clone_from(&args.fields);
    }
    if args.from.is_some() {
        config.from.clone_from(&args.from);
    }
    if args.to.is_some() {
        config.to.clone_from(&args.to);
    }
    config.limit = args.limit.or(config.limit);
    config.offset = args.offset.or(config.offset);
    if args.fast_latest {
        config.fast_latest = Some(true);
    }
    config.percent_encode |= args.encode;
}
