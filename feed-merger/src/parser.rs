use crate::rss_utils::{feed::extract_text_from_html, time::format_iso_millis};
use crate::types::{MergerError, RawFeed, RawItem, Result};
use chrono::Utc;
use feed_rs::parser;
use tracing::{debug, info};

/// Turns RSS/Atom bytes into the loosely-typed `RawFeed` shape.
pub struct FeedParser;

impl FeedParser {
    /// Parses a fetched response body, rejecting bodies that carry no
    /// RSS/Atom markers (HTML error pages, JSON) before handing them to
    /// the XML parser.
    pub fn parse_response(content: &[u8]) -> Result<RawFeed> {
        if !Self::is_valid_feed_content(&String::from_utf8_lossy(content)) {
            return Err(MergerError::Parse("Response is not an RSS/Atom feed".to_string()));
        }
        Self::parse_feed(content)
    }

    pub fn parse_feed(content: &[u8]) -> Result<RawFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        // Entries without an id keep an empty one so the link stands in as guid
        let feed = parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(content)
            .map_err(|e| MergerError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let description = feed.description.map(|d| d.content);
        let link = feed.links.first().map(|l| l.href.clone());

        let items: Vec<RawItem> = feed.entries.into_iter().map(Self::parse_entry).collect();

        info!("Parsed feed with {} entries", items.len());

        Ok(RawFeed {
            title,
            description,
            link,
            items,
        })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> RawItem {
        let title = entry.title.map(|t| t.content);
        let link = entry.links.first().map(|l| l.href.clone());

        let guid = if entry.id.is_empty() { None } else { Some(entry.id) };

        // Summary with markup removed, like a reader's text snippet
        let content_snippet = entry
            .summary
            .as_ref()
            .map(|s| extract_text_from_html(&s.content))
            .filter(|s| !s.is_empty());

        let content = entry.content.and_then(|c| c.body).or_else(|| entry.summary.map(|s| s.content));

        let author = entry.authors.first().map(|a| a.name.clone()).filter(|a| !a.is_empty());

        // Publication date, falling back to the updated stamp
        let date = entry.published.or(entry.updated).map(|dt| dt.with_timezone(&Utc));
        let pub_date = date.map(|dt| dt.to_rfc2822());
        let iso_date = date.map(|dt| format_iso_millis(&dt));

        let category = entry.categories.into_iter().map(|c| c.term).find(|t| !t.is_empty());

        RawItem {
            title,
            link,
            content_snippet,
            content,
            pub_date,
            iso_date,
            author,
            creator: None,
            guid,
            category,
        }
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        let has_rss_indicators = content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("xmlns=\"http://www.w3.org/2005/atom\"")
            || content_lower.contains("<channel");

        let has_xml_declaration = content.trim_start().starts_with("<?xml");

        has_rss_indicators && (has_xml_declaration || content_lower.contains("<"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample Blog</title>
    <link>https://blog.example.org/</link>
    <description>Posts</description>
    <item>
      <title>Second post</title>
      <link>https://blog.example.org/2</link>
      <description>&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</description>
      <pubDate>Fri, 02 May 2025 10:00:00 +0000</pubDate>
      <guid>post-2</guid>
      <category>Rust</category>
      <author>jane@example.org (Jane)</author>
    </item>
    <item>
      <title>Undated post</title>
      <link>https://blog.example.org/1</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_rss_into_raw_feed() {
        let feed = FeedParser::parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Sample Blog"));
        assert_eq!(feed.items.len(), 2);

        let first = &feed.items[0];
        assert_eq!(first.title.as_deref(), Some("Second post"));
        assert_eq!(first.link.as_deref(), Some("https://blog.example.org/2"));
        assert_eq!(first.guid.as_deref(), Some("post-2"));
        assert_eq!(first.category.as_deref(), Some("Rust"));
        assert_eq!(first.content_snippet.as_deref(), Some("Hello world"));
        assert_eq!(first.iso_date.as_deref(), Some("2025-05-02T10:00:00.000Z"));
        assert!(first.pub_date.is_some());

        assert!(feed.items[1].iso_date.is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(FeedParser::parse_feed(b"definitely not xml").is_err());
        assert!(!FeedParser::is_valid_feed_content("hello"));
        assert!(FeedParser::is_valid_feed_content(SAMPLE_RSS));
    }

    #[test]
    fn non_feed_responses_are_parse_errors() {
        let html = b"<!DOCTYPE html><html><body><h1>502 Bad Gateway</h1></body></html>";
        match FeedParser::parse_response(html) {
            Err(MergerError::Parse(msg)) => assert!(msg.contains("not an RSS/Atom feed")),
            other => panic!("expected parse error, got {:?}", other.map(|f| f.items.len())),
        }
        assert!(FeedParser::parse_response(br#"{"items": []}"#).is_err());

        let feed = FeedParser::parse_response(SAMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(feed.items.len(), 2);
    }

    #[test]
    fn items_without_guid_fall_back_to_link() {
        use crate::config::SourceConfig;
        use crate::normalizer::ItemNormalizer;

        let feed = FeedParser::parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        assert!(feed.items[1].guid.is_none());

        let source = SourceConfig::new(Some("https://blog.example.org/feed.xml".to_string()), "Blog", "Blog")
            .with_link_rewrite("blog.example.org", "example.org");
        let result = ItemNormalizer::new(&source).normalize(feed);
        let undated = result.items.iter().find(|i| i.title.as_deref() == Some("Undated post")).unwrap();
        assert_eq!(undated.link.as_deref(), Some("https://example.org/1"));
        assert_eq!(undated.guid, undated.link);

        let dated = result.items.iter().find(|i| i.title.as_deref() == Some("Second post")).unwrap();
        assert_eq!(dated.guid.as_deref(), Some("post-2"));
    }
}
