//! API handlers for the REST API.

pub mod category;
pub mod channel;
pub mod feed;

pub use category::*;
pub use channel::*;
pub use feed::*;

use std::sync::Arc;

use crate::config::{FeedCacheConfig, YoutubeConfig};
use crate::youtube::{
    ChannelResolver, FeedCache, FeedFetcher, FeedService, HttpPageSource, PageSource,
};
use crate::{Database, Result};

/// Shared state for all handlers.
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// Channel URL resolver.
    pub resolver: ChannelResolver,
    /// Aggregated feeds and their cache.
    pub feeds: FeedService,
}

impl AppState {
    /// Create state that reaches the provider over HTTP.
    pub fn new(
        db: Database,
        youtube: &YoutubeConfig,
        feed_cache: &FeedCacheConfig,
    ) -> Result<Self> {
        let source = Arc::new(HttpPageSource::new(youtube)?);
        Ok(Self::with_source(db, source, youtube, feed_cache))
    }

    /// Create state on top of an arbitrary page source.
    pub fn with_source(
        db: Database,
        source: Arc<dyn PageSource>,
        youtube: &YoutubeConfig,
        feed_cache: &FeedCacheConfig,
    ) -> Self {
        let resolver = ChannelResolver::new(source.clone(), youtube);
        let fetcher = FeedFetcher::new(source, youtube.base()).with_batch_size(youtube.batch_size);
        let feeds = FeedService::new(fetcher, FeedCache::new(feed_cache));

        Self {
            db,
            resolver,
            feeds,
        }
    }
}
