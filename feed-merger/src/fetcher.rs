use crate::parser::FeedParser;
use crate::traits::FeedFetcher;
use crate::types::{FetchConfig, MergerError, RawFeed, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// HTTP implementation of the fetch capability. One request per call.
pub struct HttpFeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFeedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Url::parse(url)?;
        let start_time = Instant::now();

        debug!("Requesting {}", parsed);
        let response = self.client.get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("HTTP {} for {}", status, url);
            return Err(MergerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(MergerError::FeedTooLarge { size_mb });
            }
        }

        let body = response.bytes().await?;
        let size_mb = body.len() / (1024 * 1024);
        if size_mb > self.config.max_feed_size_mb {
            return Err(MergerError::FeedTooLarge { size_mb });
        }

        info!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<RawFeed> {
        let body = self.fetch_bytes(url).await?;
        FeedParser::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_rejected_before_any_request() {
        let fetcher = HttpFeedFetcher::new(FetchConfig::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, MergerError::InvalidUrl(_)));
    }
}
