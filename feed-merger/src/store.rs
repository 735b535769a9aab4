use crate::encoders::encode_structured;
use crate::traits::FeedStore;
use crate::types::{MergedFeed, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writes documents under a root directory, creating it on first use.
pub struct FsFeedStore {
    root: PathBuf,
}

impl FsFeedStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<PathBuf> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, content).await?;
        debug!("Wrote {} bytes to {}", content.len(), target.display());
        Ok(target)
    }
}

#[async_trait]
impl FeedStore for FsFeedStore {
    async fn write_structured(&self, path: &Path, feed: &MergedFeed) -> Result<()> {
        let bytes = encode_structured(feed)?;
        let target = self.write_file(path, &bytes).await?;
        info!("Successfully saved merged feed to {}", target.display());
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()> {
        let target = self.write_file(path, content).await?;
        info!("Generated RSS XML at {}", target.display());
        Ok(())
    }
}
