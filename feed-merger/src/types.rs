use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rss_utils::time::parse_timestamp;

/// Feed as handed back by a fetch capability, before any normalization.
/// Every field may be missing; nothing here is trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub content_snippet: Option<String>,
    pub content: Option<String>,
    pub pub_date: Option<String>,
    pub iso_date: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub guid: Option<String>,
    pub category: Option<String>,
}

/// A feed entry after link rewriting, cleanup and defaulting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_date: Option<String>,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub category: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_title: Option<String>,
}

impl CanonicalItem {
    /// `isoDate` when present, otherwise `pubDate`. `None` when neither parses.
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = match self.iso_date.as_deref() {
            Some(iso) if !iso.trim().is_empty() => iso,
            _ => self.pub_date.as_deref()?,
        };
        parse_timestamp(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub category: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedInfo {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
            || self
                .title
                .as_deref()
                .map(|t| t.starts_with(ERROR_TITLE_PREFIX))
                .unwrap_or(false)
    }
}

pub const ERROR_TITLE_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResult {
    pub feed_info: FeedInfo,
    pub items: Vec<CanonicalItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedMeta {
    pub title: String,
    pub description: String,
    #[serde(with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
    pub total_items: usize,
    pub sources: Vec<FeedInfo>,
    pub generated_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedFeed {
    pub meta: MergedMeta,
    pub items: Vec<CanonicalItem>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Feed-Merger/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// `lastUpdated` is written as `2025-05-01T12:00:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MergerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Fetch of {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML write error: {0}")]
    Xml(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, MergerError>;
