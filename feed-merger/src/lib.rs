pub mod types;
pub mod config;
pub mod traits;
pub mod rss_utils;
pub mod parser;
pub mod fetcher;
pub mod normalizer;
pub mod orchestrator;
pub mod fallback;
pub mod merge;
pub mod encoders;
pub mod store;
pub mod aggregator;

pub use types::*;
pub use config::{LinkRewrite, MergerConfig, SourceConfig, SourceRegistry, SourceRules};
pub use traits::{FeedFetcher, FeedStore};
pub use parser::FeedParser;
pub use fetcher::HttpFeedFetcher;
pub use normalizer::ItemNormalizer;
pub use orchestrator::FetchOrchestrator;
pub use fallback::example_feed_results;
pub use merge::merge_feeds;
pub use store::FsFeedStore;
pub use aggregator::{FeedMerger, RunSummary};
