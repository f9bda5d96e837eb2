//! Aggregated feed fetching across channels.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::youtube::client::PageSource;
use crate::youtube::parser::parse_feed;
use crate::youtube::types::{feed_url, Video, DEFAULT_BATCH_SIZE};

/// Fetches channel feeds and merges them newest-first.
pub struct FeedFetcher {
    source: Arc<dyn PageSource>,
    base_url: String,
    batch_size: usize,
}

impl FeedFetcher {
    /// Create a fetcher with the default batch size.
    pub fn new(source: Arc<dyn PageSource>, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set how many channels are fetched concurrently.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Fetch every channel's feed and return all videos, newest first.
    ///
    /// Batches run one after another; channels inside a batch run
    /// concurrently. A channel that fails contributes nothing.
    pub async fn fetch(&self, channel_ids: &[String]) -> Vec<Video> {
        let mut videos = Vec::new();

        for batch in channel_ids.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|id| self.fetch_channel(id))).await;
            videos.extend(results.into_iter().flatten());
        }

        sort_newest_first(&mut videos);
        debug!(
            channels = channel_ids.len(),
            videos = videos.len(),
            "Fetched channel feeds"
        );
        videos
    }

    /// Fetch a single channel's feed. Failures yield an empty list.
    pub async fn fetch_channel(&self, channel_id: &str) -> Vec<Video> {
        let url = feed_url(&self.base_url, channel_id);

        let body = match self.source.get_text(&url, None).await {
            Ok(body) => body,
            Err(e) => {
                warn!(channel_id, error = %e, "Failed to fetch channel feed");
                return Vec::new();
            }
        };

        match parse_feed(body.as_bytes(), channel_id) {
            Ok(feed) => feed.videos,
            Err(e) => {
                warn!(channel_id, error = %e, "Failed to parse channel feed");
                Vec::new()
            }
        }
    }
}

/// Sort descending by publication time; videos without one go last.
pub fn sort_newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
