//! Feed service for ytshelf.
//!
//! Entry point for aggregated feeds: cache first, fetch on a miss.

use tokio::sync::Mutex;
use tracing::debug;

use crate::youtube::cache::FeedCache;
use crate::youtube::fetcher::FeedFetcher;
use crate::youtube::types::Video;
use crate::{Result, ShelfError};

/// Service for aggregated feeds.
pub struct FeedService {
    fetcher: FeedFetcher,
    cache: Mutex<FeedCache>,
}

impl FeedService {
    /// Create a new FeedService.
    pub fn new(fetcher: FeedFetcher, cache: FeedCache) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(cache),
        }
    }

    /// Videos for a channel set, newest first.
    ///
    /// The cache lock is released while feeds are fetched. Dropping the
    /// returned future before it completes leaves the cache untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `channel_ids` is empty.
    pub async fn videos_for(&self, channel_ids: &[String]) -> Result<Vec<Video>> {
        if channel_ids.is_empty() {
            return Err(ShelfError::Validation(
                "at least one channel ID is required".to_string(),
            ));
        }

        if let Some(videos) = self.cache.lock().await.get(channel_ids) {
            debug!(channels = channel_ids.len(), "Feed cache hit");
            return Ok(videos);
        }

        let videos = self.fetcher.fetch(channel_ids).await;
        self.cache.lock().await.set(channel_ids, videos.clone());

        Ok(videos)
    }

    /// Videos for a channel set, or an empty list when there are none.
    pub async fn videos_for_optional(&self, channel_ids: &[String]) -> Result<Vec<Video>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.videos_for(channel_ids).await
    }

    /// Clear every cached feed.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        let dropped = cache.len();
        cache.invalidate_all();
        debug!(dropped, "Feed cache invalidated");
    }

    #[cfg(test)]
    pub async fn cached_sets(&self) -> usize {
        self.cache.lock().await.len()
    }
}
