use crate::types::{FetchConfig, MergerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// URLs shipped in the sample configuration. A source pointing at one of
/// these is treated as not configured.
pub const PLACEHOLDER_URLS: &[&str] = &[
    "https://example.com/feed1.xml",
    "https://example.com/feed2.xml",
];

pub const DEFAULT_MAX_ITEMS: usize = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_OUTPUT_FILE: &str = "feed.json";
pub const DEFAULT_XML_FILE: &str = "feed.xml";

/// Substring replacement applied to both `link` and `guid`, typically
/// mapping a mirror domain back to the canonical one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRewrite {
    pub pattern: String,
    pub replacement: String,
}

impl LinkRewrite {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Rewrites until the text stops changing, so applying the rule to its
    /// own output is a no-op (`m.m.example.com` ends as `example.com`).
    pub fn apply(&self, value: &str) -> String {
        if self.pattern.is_empty() {
            return value.to_string();
        }
        let mut current = value.to_string();
        for _ in 0..MAX_REWRITE_PASSES {
            let next = self.apply_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn apply_once(&self, value: &str) -> String {
        // Text already in replaced form is skipped when the replacement
        // contains the pattern, otherwise every pass would grow it.
        if !self.replacement.is_empty() && self.replacement.contains(&self.pattern) {
            return rewrite_skipping_replaced(value, &self.pattern, &self.replacement);
        }
        value.replace(&self.pattern, &self.replacement)
    }
}

const MAX_REWRITE_PASSES: usize = 16;

fn rewrite_skipping_replaced(value: &str, pattern: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while !rest.is_empty() {
        if rest.starts_with(replacement) {
            out.push_str(replacement);
            rest = &rest[replacement.len()..];
        } else if rest.starts_with(pattern) {
            out.push_str(replacement);
            rest = &rest[pattern.len()..];
        } else {
            let ch = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            out.push_str(&rest[..ch]);
            rest = &rest[ch..];
        }
    }
    out
}

/// Per-source text rules. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRules {
    #[serde(default)]
    pub link_rewrites: Vec<LinkRewrite>,
    /// Stripped once from the end of a title when present.
    #[serde(default)]
    pub title_suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub min_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rules: SourceRules,
}

impl SourceConfig {
    pub fn new(url: Option<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            name: name.into(),
            category: category.into(),
            min_date: None,
            rules: SourceRules::default(),
        }
    }

    pub fn with_min_date(mut self, min_date: DateTime<Utc>) -> Self {
        self.min_date = Some(min_date);
        self
    }

    pub fn with_link_rewrite(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.rules.link_rewrites.push(LinkRewrite::new(pattern, replacement));
        self
    }

    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.rules.title_suffixes.push(suffix.into());
        self
    }

    /// URL present, non-blank and not a shipped placeholder.
    pub fn is_enabled(&self) -> bool {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => !PLACEHOLDER_URLS.contains(&url),
            _ => false,
        }
    }
}

/// Ordered list of configured sources. Order is preserved through fetching
/// and into the merged summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self { sources }
    }

    /// The two environment-driven slots: "Feed 1" (Blog) and "Feed 2" (News).
    pub fn from_feed_urls(feed_1: Option<String>, feed_2: Option<String>) -> Self {
        Self::new(vec![
            SourceConfig::new(feed_1, "Feed 1", "Blog"),
            SourceConfig::new(feed_2, "Feed 2", "News"),
        ])
    }

    /// JSON array of source entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let sources: Vec<SourceConfig> = serde_json::from_str(json)?;
        debug!("Loaded {} source definitions", sources.len());
        Ok(Self::new(sources))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MergerError::Config(format!("cannot read sources file {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json_str(&content)?;
        info!("Loaded {} sources from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn all(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn enabled(&self) -> Vec<SourceConfig> {
        self.sources.iter().filter(|s| s.is_enabled()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Everything a run needs, built once at start-up.
#[derive(Debug, Clone)]
pub struct MergerConfig {
    pub sources: SourceRegistry,
    pub max_items: usize,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub xml_file: String,
    pub write_xml: bool,
    pub fetch: FetchConfig,
}

impl MergerConfig {
    pub fn new(sources: SourceRegistry) -> Self {
        Self {
            sources,
            max_items: DEFAULT_MAX_ITEMS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            xml_file: DEFAULT_XML_FILE.to_string(),
            write_xml: true,
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }
}

/// Reads leading decimal digits; anything missing, non-numeric or zero
/// yields the default.
pub fn parse_max_items(raw: Option<&str>) -> usize {
    let digits: String = raw
        .unwrap_or("")
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => DEFAULT_MAX_ITEMS,
        Ok(n) => n,
    }
}
