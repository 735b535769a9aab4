use crate::types::{MergedFeed, RawFeed, Result};
use async_trait::async_trait;
use std::path::Path;

/// Capability for retrieving and parsing a feed from a URL.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// One attempt; errors are reported, never retried here.
    async fn fetch(&self, url: &str) -> Result<RawFeed>;
}

/// Capability for persisting the produced documents.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Write the merged feed as a pretty-printed structured document.
    async fn write_structured(&self, path: &Path, feed: &MergedFeed) -> Result<()>;

    /// Write raw bytes (the syndication document).
    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()>;
}
