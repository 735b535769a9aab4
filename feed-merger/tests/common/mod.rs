#![allow(dead_code)]

use async_trait::async_trait;
use feed_merger::{FeedFetcher, FeedStore, MergedFeed, MergerError, RawFeed, RawItem, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

pub enum Canned {
    Feed(RawFeed),
    Fail(String),
    Hang,
}

/// Fetcher that answers from a fixed table and records every URL asked for.
pub struct StubFetcher {
    responses: HashMap<String, Canned>,
    pub requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, url: &str, response: Canned) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<RawFeed> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Feed(feed)) => Ok(feed.clone()),
            Some(Canned::Fail(msg)) => Err(MergerError::General(msg.clone())),
            Some(Canned::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(MergerError::General("unreachable".to_string()))
            }
            None => Err(MergerError::General(format!("no stub for {}", url))),
        }
    }
}

/// Store that keeps documents in memory and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    pub structured: Mutex<Vec<(PathBuf, MergedFeed)>>,
    pub bytes: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    pub fail_bytes: bool,
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn write_structured(&self, path: &Path, feed: &MergedFeed) -> Result<()> {
        self.structured.lock().unwrap().push((path.to_path_buf(), feed.clone()));
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()> {
        if self.fail_bytes {
            return Err(MergerError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")));
        }
        self.bytes.lock().unwrap().push((path.to_path_buf(), content.to_vec()));
        Ok(())
    }
}

pub fn raw_item(title: &str, link: &str, iso: &str) -> RawItem {
    RawItem {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        content_snippet: Some(format!("About {}", title)),
        iso_date: Some(iso.to_string()),
        ..Default::default()
    }
}

pub fn raw_feed(title: &str, items: Vec<RawItem>) -> RawFeed {
    RawFeed {
        title: Some(title.to_string()),
        description: Some(format!("{} description", title)),
        link: Some("https://feeds.example.net/".to_string()),
        items,
    }
}
