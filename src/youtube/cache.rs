//! Time- and size-bounded cache of merged feeds.
//!
//! Keys are channel sets, so `[a, b]` and `[b, a]` share an entry. Eviction
//! is first-in first-out; refreshing a key does not move it to the back.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::FeedCacheConfig;
use crate::youtube::types::Video;

/// Time source for the cache.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    key: String,
    videos: Vec<Video>,
    stored_at: Instant,
}

/// Feed cache. Not synchronized; the owner serializes access.
pub struct FeedCache {
    entries: VecDeque<CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    clock: Box<dyn Clock>,
}

impl FeedCache {
    pub fn new(config: &FeedCacheConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: &FeedCacheConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.max_entries),
            ttl: Duration::from_secs(config.ttl_secs),
            max_entries: config.max_entries.max(1),
            clock,
        }
    }

    /// Cached videos for this channel set, if present and fresh.
    pub fn get(&self, channel_ids: &[String]) -> Option<Vec<Video>> {
        let key = cache_key(channel_ids);
        let now = self.clock.now();
        self.entries
            .iter()
            .find(|e| e.key == key)
            .filter(|e| now.duration_since(e.stored_at) < self.ttl)
            .map(|e| e.videos.clone())
    }

    /// Store videos for this channel set.
    pub fn set(&mut self, channel_ids: &[String], videos: Vec<Video>) {
        let key = cache_key(channel_ids);
        let stored_at = self.clock.now();

        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.videos = videos;
            entry.stored_at = stored_at;
            return;
        }

        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(CacheEntry {
            key,
            videos,
            stored_at,
        });
    }

    /// Drop every entry.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }
}

/// Sorted, comma-joined channel ids.
pub fn cache_key(channel_ids: &[String]) -> String {
    let mut ids: Vec<&str> = channel_ids.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.join(",")
}
