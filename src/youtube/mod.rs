//! YouTube feed aggregation for ytshelf.
//!
//! Channel resolution, feed fetching and parsing, and the feed cache.

pub mod cache;
pub mod client;
pub mod fetcher;
pub mod parser;
pub mod resolver;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{cache_key, Clock, FeedCache, SystemClock};
pub use client::{FetchError, HttpPageSource, PageSource};
pub use fetcher::{sort_newest_first, FeedFetcher};
pub use parser::{parse_feed, ParsedFeed};
pub use resolver::{extract_channel_id, looks_like_channel_url, ChannelResolver, ResolveError};
pub use service::FeedService;
pub use types::{
    fallback_thumbnail_url, feed_url, ResolvedChannel, Video, DEFAULT_BATCH_SIZE,
    MAX_DESCRIPTION_LENGTH, MAX_FEED_SIZE,
};
