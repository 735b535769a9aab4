use crate::config::SourceConfig;
use crate::rss_utils::feed::{sanitize_description, truncate_description};
use crate::types::{CanonicalItem, FeedInfo, FeedResult, RawFeed, RawItem};
use tracing::debug;

pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Converts one fetched feed into a `FeedResult` using the rules attached to
/// its source.
pub struct ItemNormalizer<'a> {
    source: &'a SourceConfig,
}

impl<'a> ItemNormalizer<'a> {
    pub fn new(source: &'a SourceConfig) -> Self {
        Self { source }
    }

    pub fn normalize(&self, feed: RawFeed) -> FeedResult {
        let feed_info = FeedInfo {
            title: feed.title.clone(),
            description: feed.description.clone(),
            link: feed.link.clone(),
            category: self.source.category.clone(),
            name: self.source.name.clone(),
            min_date: self.source.min_date,
            error: None,
        };

        let fetched = feed.items.len();
        let items: Vec<CanonicalItem> = feed
            .items
            .into_iter()
            .map(|raw| self.normalize_item(raw, feed.title.as_deref()))
            .filter(|item| self.passes_date_filter(item))
            .collect();

        debug!(
            "Normalized {}: {} fetched, {} kept, {} dropped by date",
            self.source.name,
            fetched,
            items.len(),
            fetched - items.len()
        );

        FeedResult { feed_info, items }
    }

    pub fn normalize_item(&self, raw: RawItem, feed_title: Option<&str>) -> CanonicalItem {
        let link = raw.link.map(|l| self.rewrite_link(&l));
        let guid = raw.guid.map(|g| self.rewrite_link(&g));
        let title = raw.title.map(|t| self.clean_title(t));

        let description = raw
            .content_snippet
            .filter(|s| !s.is_empty())
            .or(raw.content)
            .map(|d| truncate_description(&sanitize_description(&d)))
            .unwrap_or_default();

        let author = first_present([raw.author, raw.creator]).unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let guid = first_present([guid, link.clone()]);
        let category = first_present([raw.category]).unwrap_or_else(|| self.source.category.clone());

        CanonicalItem {
            title,
            link,
            description,
            pub_date: raw.pub_date,
            iso_date: raw.iso_date,
            author,
            guid,
            category,
            source: self.source.name.clone(),
            feed_title: feed_title.map(str::to_string),
        }
    }

    /// Apply every configured rewrite in order.
    pub fn rewrite_link(&self, value: &str) -> String {
        self.source
            .rules
            .link_rewrites
            .iter()
            .fold(value.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Strip the first matching suffix, once.
    pub fn clean_title(&self, title: String) -> String {
        for suffix in &self.source.rules.title_suffixes {
            if !suffix.is_empty() {
                if let Some(stripped) = title.strip_suffix(suffix.as_str()) {
                    return stripped.to_string();
                }
            }
        }
        title
    }

    /// Items with no parseable timestamp fail a configured cutoff.
    fn passes_date_filter(&self, item: &CanonicalItem) -> bool {
        match self.source.min_date {
            None => true,
            Some(min_date) => match item.effective_timestamp() {
                Some(ts) => ts >= min_date,
                None => false,
            },
        }
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn source() -> SourceConfig {
        SourceConfig::new(Some("https://mirror.example.org/feed.xml".to_string()), "Example", "News")
            .with_link_rewrite("mirror.example.org", "www.example.org")
            .with_title_suffix(" - Example News")
    }

    fn raw(title: &str, link: &str, iso: Option<&str>) -> RawItem {
        RawItem {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            iso_date: iso.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn rewrites_link_and_guid_and_cleans_title() {
        let src = source();
        let normalizer = ItemNormalizer::new(&src);
        let mut item = raw("Big story - Example News", "https://mirror.example.org/a", None);
        item.guid = Some("https://mirror.example.org/a?id=1".to_string());

        let out = normalizer.normalize_item(item, Some("Example Feed"));
        assert_eq!(out.title.as_deref(), Some("Big story"));
        assert_eq!(out.link.as_deref(), Some("https://www.example.org/a"));
        assert_eq!(out.guid.as_deref(), Some("https://www.example.org/a?id=1"));
        assert_eq!(out.feed_title.as_deref(), Some("Example Feed"));
        assert_eq!(out.source, "Example");
    }

    #[test]
    fn suffix_is_stripped_only_at_the_end() {
        let src = source();
        let normalizer = ItemNormalizer::new(&src);
        assert_eq!(
            normalizer.clean_title("Example News - Example News weekly".to_string()),
            "Example News - Example News weekly"
        );
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let src = source();
        let normalizer = ItemNormalizer::new(&src);
        let out = normalizer.normalize_item(raw("t", "https://mirror.example.org/x", None), None);
        assert_eq!(out.author, "Unknown");
        assert_eq!(out.guid.as_deref(), Some("https://www.example.org/x"));
        assert_eq!(out.category, "News");
        assert_eq!(out.description, "");

        let mut with_creator = raw("t", "https://x.org", None);
        with_creator.creator = Some("Ann".to_string());
        with_creator.category = Some("Rust".to_string());
        let out = normalizer.normalize_item(with_creator, None);
        assert_eq!(out.author, "Ann");
        assert_eq!(out.category, "Rust");
    }

    #[test]
    fn snippet_preferred_over_content() {
        let src = source();
        let normalizer = ItemNormalizer::new(&src);
        let mut item = raw("t", "https://x.org", None);
        item.content = Some("<p>full body</p>".to_string());
        item.content_snippet = Some("short   snippet".to_string());
        assert_eq!(normalizer.normalize_item(item, None).description, "short snippet");
    }

    #[test]
    fn min_date_drops_older_and_undated_items() {
        let min: DateTime<Utc> = "2025-05-01T00:00:00Z".parse().unwrap();
        let src = source().with_min_date(min);
        let feed = RawFeed {
            title: Some("Example Feed".to_string()),
            items: vec![
                raw("old", "https://x.org/old", Some("2025-04-30T12:00:00Z")),
                raw("new", "https://x.org/new", Some("2025-05-02T00:00:00Z")),
                raw("undated", "https://x.org/undated", None),
            ],
            ..Default::default()
        };
        let result = ItemNormalizer::new(&src).normalize(feed);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].title.as_deref(), Some("new"));
        assert_eq!(result.feed_info.min_date, Some(min));
    }

    #[test]
    fn item_exactly_at_cutoff_is_kept() {
        let min: DateTime<Utc> = "2025-05-01T00:00:00Z".parse().unwrap();
        let src = source().with_min_date(min);
        let feed = RawFeed {
            items: vec![raw("edge", "https://x.org/e", Some("2025-05-01T00:00:00Z"))],
            ..Default::default()
        };
        assert_eq!(ItemNormalizer::new(&src).normalize(feed).items.len(), 1);
    }
}
