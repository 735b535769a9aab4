use crate::types::{MergedFeed, Result};

/// Pretty-printed JSON, two-space indent, trailing newline.
pub fn encode_structured(feed: &MergedFeed) -> Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(feed)?;
    out.push(b'\n');
    Ok(out)
}

pub fn decode_structured(bytes: &[u8]) -> Result<MergedFeed> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::example_feed_results;
    use crate::merge::merge_feeds;
    use chrono::Utc;

    #[test]
    fn document_uses_camel_case_and_omits_absent_fields() {
        let now = Utc::now();
        let merged = merge_feeds(example_feed_results(now), 10, now);
        let bytes = encode_structured(&merged).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["meta"]["totalItems"], 3);
        assert_eq!(value["meta"]["generatedBy"], "GitHub Actions RSS Merger");
        assert!(value["meta"]["sources"][0].get("link").is_none());
        assert!(value["items"][0].get("isoDate").is_some());
        assert!(value["items"][0].get("feedTitle").is_some());
        assert!(String::from_utf8(bytes).unwrap().contains("\n  \"meta\""));
    }
}
