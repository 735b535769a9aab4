use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use feed_merger::config::{parse_max_items, MergerConfig, SourceRegistry};
use feed_merger::{FeedMerger, FetchConfig, FsFeedStore, HttpFeedFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Merge several RSS/Atom feeds into one JSON document and one RSS document.
#[derive(Debug, Parser)]
#[command(name = "feed-merger", version)]
struct Args {
    /// First feed URL ("Feed 1", category Blog)
    #[arg(long = "feed-1", env = "RSS_FEED_1")]
    feed_1: Option<String>,

    /// Second feed URL ("Feed 2", category News)
    #[arg(long = "feed-2", env = "RSS_FEED_2")]
    feed_2: Option<String>,

    /// JSON file with a list of sources; replaces the two URL slots
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Maximum number of merged items (defaults to 10)
    #[arg(long, env = "MAX_ITEMS")]
    max_items: Option<String>,

    #[arg(long, env = "OUTPUT_DIR", default_value = "data")]
    output_dir: PathBuf,

    #[arg(long, default_value = "feed.json")]
    output_file: String,

    #[arg(long, default_value = "feed.xml")]
    xml_file: String,

    /// Skip writing the RSS document
    #[arg(long)]
    no_xml: bool,

    /// Per-feed fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,
}

impl Args {
    fn into_config(self) -> anyhow::Result<MergerConfig> {
        let sources = match &self.sources {
            Some(path) => SourceRegistry::from_json_file(path)?,
            None => SourceRegistry::from_feed_urls(self.feed_1, self.feed_2),
        };

        let mut config = MergerConfig::new(sources).with_max_items(parse_max_items(self.max_items.as_deref()));
        config.output_dir = self.output_dir;
        config.output_file = self.output_file;
        config.xml_file = self.xml_file;
        config.write_xml = !self.no_xml;
        config.fetch = FetchConfig {
            timeout_seconds: self.timeout_seconds,
            ..FetchConfig::default()
        };
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Args::parse().into_config()?;
    info!(
        "Configured {} sources ({} enabled), max items {}",
        config.sources.len(),
        config.sources.enabled().len(),
        config.max_items
    );

    let fetcher = Arc::new(HttpFeedFetcher::new(config.fetch.clone()).context("Failed to create HTTP client")?);
    let store = Arc::new(FsFeedStore::new(&config.output_dir));
    let merger = FeedMerger::new(config, fetcher, store);

    let summary = merger.run(Utc::now()).await.map_err(|e| {
        error!("Fatal error: {}", e);
        e
    })?;

    info!("Summary:");
    for line in summary.source_lines() {
        info!("  • {}", line);
    }

    Ok(())
}
