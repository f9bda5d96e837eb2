//! Channel feed parsing.
//!
//! Feeds are Atom documents with a `media:group` per entry. Parsing goes
//! through feed-rs; missing fields default instead of failing the feed.

use feed_rs::model::Entry;
use feed_rs::parser;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::youtube::types::{fallback_thumbnail_url, Video, MAX_DESCRIPTION_LENGTH};
use crate::{Result, ShelfError};

/// Prefix of the Atom entry id that carries the video ID.
const VIDEO_ID_PREFIX: &str = "yt:video:";

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<entry[\s>].*?</entry>").unwrap());

static VIDEO_ID_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<yt:videoId>\s*([^<\s]+)\s*</yt:videoId>").unwrap());

/// A parsed channel feed.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Channel title, when the feed has one.
    pub channel_title: Option<String>,
    /// Videos in feed order.
    pub videos: Vec<Video>,
}

/// Parse a channel feed body.
///
/// The video ID comes from the Atom id, or from `<yt:videoId>` when the id
/// lacks the `yt:video:` prefix. Entries with neither are skipped.
pub fn parse_feed(bytes: &[u8], channel_id: &str) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| ShelfError::Upstream(format!("failed to parse feed: {}", e)))?;

    let channel_title = feed.title.map(|t| t.content);
    let title_for_videos = channel_title.clone().unwrap_or_default();

    // feed-rs drops extension elements; recover them from the raw entries
    let mut element_ids = video_id_elements(&String::from_utf8_lossy(bytes));
    if element_ids.len() != feed.entries.len() {
        element_ids = vec![None; feed.entries.len()];
    }

    let videos = feed
        .entries
        .into_iter()
        .zip(element_ids)
        .filter_map(|(entry, element_id)| {
            entry_to_video(entry, element_id, channel_id, &title_for_videos)
        })
        .collect();

    Ok(ParsedFeed {
        channel_title,
        videos,
    })
}

/// `<yt:videoId>` of each `<entry>`, in document order.
fn video_id_elements(xml: &str) -> Vec<Option<String>> {
    ENTRY_RE
        .find_iter(xml)
        .map(|entry| {
            VIDEO_ID_ELEMENT_RE
                .captures(entry.as_str())
                .map(|caps| caps[1].to_string())
        })
        .collect()
}

fn entry_to_video(
    entry: Entry,
    element_id: Option<String>,
    channel_id: &str,
    channel_title: &str,
) -> Option<Video> {
    let id = entry
        .id
        .strip_prefix(VIDEO_ID_PREFIX)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or(element_id)?;

    let description = entry
        .media
        .iter()
        .find_map(|m| m.description.as_ref())
        .map(|d| truncate_description(&d.content))
        .unwrap_or_default();

    let thumbnail_url = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.clone())
        .find(|uri| !uri.is_empty())
        .unwrap_or_else(|| fallback_thumbnail_url(&id));

    Some(Video {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        description,
        thumbnail_url,
        channel_id: channel_id.to_string(),
        channel_title: channel_title.to_string(),
        published_at: entry.published,
        id,
    })
}

/// Truncate to [`MAX_DESCRIPTION_LENGTH`] characters.
fn truncate_description(text: &str) -> String {
    text.chars().take(MAX_DESCRIPTION_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const CHANNEL: &str = "UCxxxxxxxxxxxxxxxxxxxxxx";

    fn youtube_feed(title: &str, entries: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <link rel="self" href="http://www.youtube.com/feeds/videos.xml?channel_id={CHANNEL}"/>
 <id>yt:channel:{CHANNEL}</id>
 <yt:channelId>{CHANNEL}</yt:channelId>
 <title>{title}</title>
 <author>
  <name>Example</name>
  <uri>https://www.youtube.com/channel/{CHANNEL}</uri>
 </author>
 <published>2015-01-01T00:00:00+00:00</published>
{entries}
</feed>"#
        )
    }

    fn entry(video_id: &str, title: &str, published: &str, description: &str) -> String {
        format!(
            r#" <entry>
  <id>yt:video:{video_id}</id>
  <yt:videoId>{video_id}</yt:videoId>
  <yt:channelId>{CHANNEL}</yt:channelId>
  <title>{title}</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v={video_id}"/>
  <published>{published}</published>
  <updated>{published}</updated>
  <media:group>
   <media:title>{title}</media:title>
   <media:thumbnail url="https://i1.ytimg.com/vi/{video_id}/hqdefault.jpg" width="480" height="360"/>
   <media:description>{description}</media:description>
  </media:group>
 </entry>"#
        )
    }

    #[test]
    fn test_parse_youtube_feed() {
        let xml = youtube_feed(
            "Example Channel",
            &entry("abc123", "First video", "2024-05-01T12:00:00+00:00", "Hello"),
        );

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(feed.channel_title.as_deref(), Some("Example Channel"));
        assert_eq!(feed.videos.len(), 1);

        let video = &feed.videos[0];
        assert_eq!(video.id, "abc123");
        assert_eq!(video.title, "First video");
        assert_eq!(video.description, "Hello");
        assert_eq!(
            video.thumbnail_url,
            "https://i1.ytimg.com/vi/abc123/hqdefault.jpg"
        );
        assert_eq!(video.channel_id, CHANNEL);
        assert_eq!(video.channel_title, "Example Channel");
        assert_eq!(
            video.published_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_decodes_entities() {
        let xml = youtube_feed(
            "Tom &amp; Jerry&#39;s",
            &entry(
                "v1",
                "&lt;Live&gt; &quot;Q&amp;A&quot; it&#x27;s on",
                "2024-05-01T12:00:00+00:00",
                "a &amp; b",
            ),
        );

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(feed.channel_title.as_deref(), Some("Tom & Jerry's"));
        assert_eq!(feed.videos[0].title, "<Live> \"Q&A\" it's on");
        assert_eq!(feed.videos[0].description, "a & b");
        assert_eq!(feed.videos[0].channel_title, "Tom & Jerry's");
    }

    #[test]
    fn test_parse_truncates_description() {
        let long = "あ".repeat(MAX_DESCRIPTION_LENGTH + 50);
        let xml = youtube_feed(
            "C",
            &entry("v1", "T", "2024-05-01T12:00:00+00:00", &long),
        );

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(
            feed.videos[0].description.chars().count(),
            MAX_DESCRIPTION_LENGTH
        );
    }

    #[test]
    fn test_parse_thumbnail_fallback_and_missing_fields() {
        let entries = r#" <entry>
  <id>yt:video:bare01</id>
 </entry>"#;
        let xml = youtube_feed("C", entries);

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(feed.videos.len(), 1);

        let video = &feed.videos[0];
        assert_eq!(video.id, "bare01");
        assert_eq!(video.title, "");
        assert_eq!(video.description, "");
        assert_eq!(video.thumbnail_url, fallback_thumbnail_url("bare01"));
        assert!(video.published_at.is_none());
    }

    #[test]
    fn test_parse_skips_entries_without_video_id() {
        let entries = format!(
            "{}\n <entry>\n  <id>urn:uuid:1</id>\n  <title>Not a video</title>\n </entry>",
            entry("keep01", "Kept", "2024-05-01T12:00:00+00:00", "")
        );
        let xml = youtube_feed("C", &entries);

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(feed.videos.len(), 1);
        assert_eq!(feed.videos[0].id, "keep01");
    }

    #[test]
    fn test_parse_video_id_element_fallback() {
        let entries = r#" <entry>
  <id>tag:mirror.test,2024:abc</id>
  <yt:videoId>abc</yt:videoId>
  <title>Mirrored</title>
 </entry>
 <entry>
  <yt:videoId>def</yt:videoId>
  <title>No Atom id</title>
 </entry>
 <entry>
  <id>yt:video:ghi</id>
  <yt:videoId>ignored</yt:videoId>
 </entry>"#;
        let xml = youtube_feed("C", entries);

        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        let ids: Vec<&str> = feed.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["abc", "def", "ghi"]);
        assert_eq!(feed.videos[0].title, "Mirrored");
    }

    #[test]
    fn test_video_id_elements() {
        let xml = "<feed><entry><yt:videoId> x1 </yt:videoId></entry>\n<entry>\n<id>y</id></entry></feed>";
        assert_eq!(
            video_id_elements(xml),
            vec![Some("x1".to_string()), None]
        );
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = youtube_feed("Quiet Channel", "");
        let feed = parse_feed(xml.as_bytes(), CHANNEL).unwrap();
        assert_eq!(feed.channel_title.as_deref(), Some("Quiet Channel"));
        assert!(feed.videos.is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_feed(b"This is not XML", CHANNEL).is_err());
    }

    #[test]
    fn test_truncate_description() {
        assert_eq!(truncate_description("short"), "short");
        let exact = "a".repeat(MAX_DESCRIPTION_LENGTH);
        assert_eq!(truncate_description(&exact), exact);
        let long = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert_eq!(truncate_description(&long).len(), MAX_DESCRIPTION_LENGTH);
    }
}
