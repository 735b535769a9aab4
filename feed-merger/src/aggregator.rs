use crate::config::MergerConfig;
use crate::encoders::encode_rss;
use crate::merge::merge_feeds;
use crate::orchestrator::FetchOrchestrator;
use crate::traits::{FeedFetcher, FeedStore};
use crate::types::{MergedFeed, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What a run produced, for the caller to report.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub feed: MergedFeed,
    pub structured_path: PathBuf,
    pub syndication_path: Option<PathBuf>,
}

impl RunSummary {
    /// `name: title` per source, failures included.
    pub fn source_lines(&self) -> Vec<String> {
        self.feed
            .meta
            .sources
            .iter()
            .map(|s| format!("{}: {}", s.name, s.title.as_deref().unwrap_or("")))
            .collect()
    }
}

/// Fetch, merge and write, end to end.
pub struct FeedMerger {
    config: MergerConfig,
    orchestrator: FetchOrchestrator,
    store: Arc<dyn FeedStore>,
}

impl FeedMerger {
    pub fn new(config: MergerConfig, fetcher: Arc<dyn FeedFetcher>, store: Arc<dyn FeedStore>) -> Self {
        let orchestrator = FetchOrchestrator::new(fetcher, config.fetch.timeout_seconds);
        Self {
            config,
            orchestrator,
            store,
        }
    }

    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// Fetch and merge without writing anything.
    pub async fn build(&self, now: DateTime<Utc>) -> MergedFeed {
        let results = self.orchestrator.fetch_all(self.config.sources.all(), now).await;
        merge_feeds(results, self.config.max_items, now)
    }

    /// Full run. Write failures are fatal; the structured document is
    /// written before the syndication document and is left in place if the
    /// second write fails.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        info!("Starting RSS feed update process...");
        info!("Timestamp: {}", now.to_rfc3339());

        let feed = self.build(now).await;

        let structured_path = PathBuf::from(&self.config.output_file);
        self.store.write_structured(&structured_path, &feed).await?;
        info!("Total items: {}", feed.items.len());
        info!("Last updated: {}", feed.meta.last_updated.to_rfc3339());

        let syndication_path = if self.config.write_xml {
            let xml = encode_rss(&feed)?;
            let path = PathBuf::from(&self.config.xml_file);
            self.store.write_bytes(&path, &xml).await?;
            Some(path)
        } else {
            None
        };

        info!("RSS feed update completed successfully!");

        Ok(RunSummary {
            feed,
            structured_path,
            syndication_path,
        })
    }
}
