use crate::rss_utils::time::format_iso_millis;
use crate::types::{CanonicalItem, FeedInfo, FeedResult};
use chrono::{DateTime, Duration, Utc};

struct ExampleEntry {
    title: &'static str,
    link: &'static str,
    description: &'static str,
    days_ago: i64,
    category: &'static str,
    source: &'static str,
    feed_title: &'static str,
}

const EXAMPLE_ENTRIES: [ExampleEntry; 3] = [
    ExampleEntry {
        title: "Latest Project Update: New Feature Release",
        link: "https://yourblog.com/post1",
        description: "Exciting new features have been added to the project...",
        days_ago: 2,
        category: "Development",
        source: "Blog",
        feed_title: "Personal Blog",
    },
    ExampleEntry {
        title: "Speaking at Tech Conference 2025",
        link: "https://conference.com/speaker/you",
        description: "Excited to announce my upcoming speaking engagement...",
        days_ago: 4,
        category: "Events",
        source: "Events",
        feed_title: "Professional Updates",
    },
    ExampleEntry {
        title: "Open Source Contribution Milestone",
        link: "https://github.com/project/milestone",
        description: "Reached an important milestone in open source contributions...",
        days_ago: 7,
        category: "Open Source",
        source: "GitHub",
        feed_title: "Development Updates",
    },
];

/// Fixed example dataset used when no source is configured. Timestamps are
/// relative to `now`, so output is deterministic for a given instant.
pub fn example_feed_results(now: DateTime<Utc>) -> Vec<FeedResult> {
    let items = EXAMPLE_ENTRIES
        .iter()
        .map(|entry| {
            let stamp = format_iso_millis(&(now - Duration::days(entry.days_ago)));
            CanonicalItem {
                title: Some(entry.title.to_string()),
                link: Some(entry.link.to_string()),
                description: entry.description.to_string(),
                pub_date: Some(stamp.clone()),
                iso_date: Some(stamp),
                author: "Your Name".to_string(),
                guid: Some(entry.link.to_string()),
                category: entry.category.to_string(),
                source: entry.source.to_string(),
                feed_title: Some(entry.feed_title.to_string()),
            }
        })
        .collect();

    vec![FeedResult {
        feed_info: FeedInfo {
            title: Some("Example Feed".to_string()),
            description: Some("Example RSS data".to_string()),
            link: None,
            category: "Example".to_string(),
            name: "Example".to_string(),
            min_date: None,
            error: None,
        },
        items,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_data_is_deterministic_for_an_instant() {
        let now: DateTime<Utc> = "2025-06-10T12:00:00Z".parse().unwrap();
        let first = example_feed_results(now);
        assert_eq!(first, example_feed_results(now));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].items.len(), 3);
        assert_eq!(first[0].items[0].iso_date.as_deref(), Some("2025-06-08T12:00:00.000Z"));
        assert_eq!(first[0].items[2].iso_date.as_deref(), Some("2025-06-03T12:00:00.000Z"));
        assert!(first[0].items.iter().all(|i| i.guid.is_some()));
    }
}
