use crate::config::SourceConfig;
use crate::fallback::example_feed_results;
use crate::normalizer::ItemNormalizer;
use crate::rss_utils::url::is_valid_rss_url;
use crate::traits::FeedFetcher;
use crate::types::{FeedInfo, FeedResult, MergerError, Result, ERROR_TITLE_PREFIX};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fetches every enabled source concurrently and normalizes each result.
pub struct FetchOrchestrator {
    fetcher: Arc<dyn FeedFetcher>,
    timeout: Duration,
}

impl FetchOrchestrator {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, timeout_seconds: u64) -> Self {
        Self {
            fetcher,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    /// One `FeedResult` per enabled source, in registry order. Falls back to
    /// the example dataset when nothing is enabled.
    pub async fn fetch_all(&self, sources: &[SourceConfig], now: DateTime<Utc>) -> Vec<FeedResult> {
        info!("Starting RSS feed fetch...");

        let enabled: Vec<SourceConfig> = sources.iter().filter(|s| s.is_enabled()).cloned().collect();

        if enabled.is_empty() {
            info!("No valid RSS feed URLs provided. Using example data.");
            return example_feed_results(now);
        }

        for source in enabled.iter().filter(|s| !is_valid_rss_url(s.url.as_deref().unwrap_or(""))) {
            warn!("Source {} does not have an http(s) URL", source.name);
        }

        let handles = enabled.iter().cloned().map(|source| {
            let fetcher = self.fetcher.clone();
            let timeout = self.timeout;
            tokio::spawn(async move { fetch_source(fetcher.as_ref(), &source, timeout).await })
        });

        // Settle every task; a panic in one only affects its own slot
        let settled = join_all(handles).await;

        let results: Vec<FeedResult> = settled
            .into_iter()
            .zip(enabled.iter())
            .map(|(outcome, source)| match outcome {
                Ok(result) => result,
                Err(join_error) => {
                    error!("Failed to fetch feed {}: {}", source.name, join_error);
                    error_result(source, &join_error.to_string())
                }
            })
            .collect();

        let failed = results.iter().filter(|r| r.feed_info.is_error()).count();
        info!("Fetched {} feeds ({} failed)", results.len(), failed);

        results
    }
}

/// Fetch and normalize a single source. Never fails: errors become an empty
/// result with an error-flavored title.
pub async fn fetch_source(fetcher: &dyn FeedFetcher, source: &SourceConfig, timeout: Duration) -> FeedResult {
    let url = source.url.clone().unwrap_or_default();
    info!("Fetching feed: {} ({})", source.name, url);

    let fetched: Result<_> = match tokio::time::timeout(timeout, fetcher.fetch(&url)).await {
        Ok(result) => result,
        Err(_) => Err(MergerError::Timeout {
            url: url.clone(),
            seconds: timeout.as_secs(),
        }),
    };

    match fetched {
        Ok(feed) => ItemNormalizer::new(source).normalize(feed),
        Err(e) => {
            warn!("Error fetching feed {}: {}", source.name, e);
            error_result(source, &e.to_string())
        }
    }
}

pub fn error_result(source: &SourceConfig, message: &str) -> FeedResult {
    FeedResult {
        feed_info: FeedInfo {
            title: Some(format!("{}{}", ERROR_TITLE_PREFIX, source.name)),
            description: Some("Failed to fetch feed".to_string()),
            link: source.url.clone(),
            category: source.category.clone(),
            name: source.name.clone(),
            min_date: source.min_date,
            error: Some(message.to_string()),
        },
        items: Vec::new(),
    }
}
