use crate::types::{CanonicalItem, FeedResult, MergedFeed, MergedMeta};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

pub const MERGED_TITLE: &str = "Merged RSS Feed";
pub const MERGED_DESCRIPTION: &str = "Combined feed from multiple sources";
pub const GENERATED_BY: &str = "GitHub Actions RSS Merger";

/// Concatenate, sort newest-first, truncate to `max_items`.
///
/// The sort is stable, so equal timestamps keep source order and then
/// intra-source order. Items without a parseable timestamp go last.
pub fn merge_feeds(results: Vec<FeedResult>, max_items: usize, now: DateTime<Utc>) -> MergedFeed {
    let mut sources = Vec::with_capacity(results.len());
    let mut all_items: Vec<CanonicalItem> = Vec::new();

    for result in results {
        sources.push(result.feed_info);
        all_items.extend(result.items);
    }

    let total_before = all_items.len();
    let mut keyed: Vec<(Option<DateTime<Utc>>, CanonicalItem)> = all_items
        .into_iter()
        .map(|item| (item.effective_timestamp(), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| newest_first(a, b));

    let items: Vec<CanonicalItem> = keyed.into_iter().take(max_items).map(|(_, item)| item).collect();

    debug!("Merged {} items from {} sources, kept {}", total_before, sources.len(), items.len());

    MergedFeed {
        meta: MergedMeta {
            title: MERGED_TITLE.to_string(),
            description: MERGED_DESCRIPTION.to_string(),
            last_updated: now,
            total_items: items.len(),
            sources,
            generated_by: GENERATED_BY.to_string(),
        },
        items,
    }
}

fn newest_first(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
