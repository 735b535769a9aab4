//! Feed-specific utility functions shared by the normalizer and the encoders

/// URL utilities for feed sources
pub mod url {
    use url::Url;

    /// Validate feed URL format
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}

/// Timestamp parsing and formatting
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

    /// Parse a feed date. Accepts RFC 3339, RFC 2822, a bare `YYYY-MM-DD`
    /// (midnight UTC) and `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// `Thu, 01 May 2025 00:00:00 GMT`
    pub fn format_rfc1123(dt: &DateTime<Utc>) -> String {
        dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// `2025-05-01T00:00:00.000Z`
    pub fn format_iso_millis(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Text cleanup for feed descriptions
pub mod feed {
    use once_cell::sync::Lazy;
    use regex::Regex;

    /// Descriptions longer than this many characters get truncated.
    pub const TRUNCATE_THRESHOLD: usize = 100;
    /// Characters kept when truncating.
    pub const TRUNCATE_LENGTH: usize = 297;
    pub const ELLIPSIS: &str = "...";

    // `.selector { ... }`, `#id .cls { ... }`, `@font-face { ... }`.
    // A selector name never starts with a digit, so `v1.2 {beta}` survives.
    static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"[.#@][A-Za-z_-][\w-]*(?:[.#:\s,>+~]+[\w-]+)*\s*\{[^{}]*\}").unwrap()
    });
    static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    /// Extract clean text content from HTML. Entities are decoded after the
    /// tags are gone, so `&lt;b&gt;` comes out as literal `<b>`.
    pub fn extract_text_from_html(html: &str) -> String {
        let stripped = html
            .chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => (text, true),
                '>' => (text, false),
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0;
        html_escape::decode_html_entities(&stripped)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Strip embedded style blocks, collapse whitespace and trim.
    pub fn sanitize_description(text: &str) -> String {
        let stripped = STYLE_BLOCK.replace_all(text, " ");
        WHITESPACE.replace_all(&stripped, " ").trim().to_string()
    }

    /// Anything over `TRUNCATE_THRESHOLD` chars is cut to `TRUNCATE_LENGTH`
    /// chars plus an ellipsis. Counts chars, not bytes.
    pub fn truncate_description(text: &str) -> String {
        if text.chars().count() > TRUNCATE_THRESHOLD {
            let mut out: String = text.chars().take(TRUNCATE_LENGTH).collect();
            out.push_str(ELLIPSIS);
            out
        } else {
            text.to_string()
        }
    }

    /// First `max_chars` characters, and whether anything was cut.
    pub fn preview(text: &str, max_chars: usize) -> (String, bool) {
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        let truncated = chars.next().is_some();
        (head, truncated)
    }
}
