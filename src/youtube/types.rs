//! YouTube feed types for ytshelf.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum length of a video description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of channel feeds fetched concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// A video reconstructed from a channel feed. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    /// Video ID.
    pub id: String,
    /// Video title.
    pub title: String,
    /// Description, at most [`MAX_DESCRIPTION_LENGTH`] characters.
    pub description: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Source channel ID.
    pub channel_id: String,
    /// Source channel title.
    pub channel_title: String,
    /// Publication time, when the feed provides a parsable one.
    pub published_at: Option<DateTime<Utc>>,
}

/// Channel identity and display metadata produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    /// Channel ID (`UC` + 22 characters).
    pub channel_id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL, when known.
    pub thumbnail_url: Option<String>,
}

/// Thumbnail used when a feed entry carries none.
pub fn fallback_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", video_id)
}

/// Feed URL for a channel under the given provider base URL.
pub fn feed_url(base_url: &str, channel_id: &str) -> String {
    format!(
        "{}/feeds/videos.xml?channel_id={}",
        base_url.trim_end_matches('/'),
        channel_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_thumbnail_url() {
        assert_eq!(
            fallback_thumbnail_url("dQw4w9WgXcQ"),
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
    }

    #[test]
    fn test_feed_url() {
        assert_eq!(
            feed_url("https://www.youtube.com/", "UC123"),
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC123"
        );
    }

    #[test]
    fn test_video_serializes_missing_timestamp_as_null() {
        let video = Video {
            id: "v1".to_string(),
            title: "t".to_string(),
            description: String::new(),
            thumbnail_url: fallback_thumbnail_url("v1"),
            channel_id: "c1".to_string(),
            channel_title: "C".to_string(),
            published_at: None,
        };
        let value = serde_json::to_value(&video).unwrap();
        assert!(value["published_at"].is_null());
        assert_eq!(value["channel_id"], "c1");
    }
}
