//! Channel URL resolution.
//!
//! A `/channel/UC...` URL carries the identifier directly. Handles and
//! custom URLs need the channel page, which is scanned for the identifier.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::YoutubeConfig;
use crate::youtube::client::{FetchError, PageSource};
use crate::youtube::parser::parse_feed;
use crate::youtube::types::{feed_url, ResolvedChannel};

/// Channel identifier embedded in a `/channel/` path.
static CHANNEL_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/channel/(UC[A-Za-z0-9_-]{22})").unwrap());

/// Page patterns, tried in order.
static PAGE_ID_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"channel_id=(UC[A-Za-z0-9_-]{22})").unwrap(),
        Regex::new(r#""channelId":"(UC[A-Za-z0-9_-]{22})""#).unwrap(),
        Regex::new(r"/channel/(UC[A-Za-z0-9_-]{22})").unwrap(),
    ]
});

static CHANNEL_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(www\.|m\.)?youtube\.com/(@[^/?#\s]+|channel/[^/?#\s]+|c/[^/?#\s]+|user/[^/?#\s]+)")
        .unwrap()
});

static OG_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta\s+property="og:image"\s+content="([^"]+)""#).unwrap()
});

/// Why a channel could not be resolved. Messages are shown to users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid channel URL: {0}")]
    InvalidUrl(String),

    #[error("could not load the channel page ({0})")]
    PageFetchFailed(FetchError),

    #[error("could not find a channel ID on the page, check the URL")]
    IdNotFound,
}

/// Extract a channel identifier from a `/channel/<id>` URL.
pub fn extract_channel_id(url: &str) -> Option<String> {
    CHANNEL_PATH_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Check whether `text` is a YouTube channel, handle or custom URL.
pub fn looks_like_channel_url(text: &str) -> bool {
    CHANNEL_URL_RE.is_match(text.trim())
}

fn find_channel_id_in_page(html: &str) -> Option<String> {
    PAGE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(html).map(|caps| caps[1].to_string()))
}

fn find_page_thumbnail(html: &str) -> Option<String> {
    OG_IMAGE_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
        .filter(|url| !url.is_empty())
}

/// Resolves user input to a channel identity.
pub struct ChannelResolver {
    source: Arc<dyn PageSource>,
    base_url: String,
    user_agent: String,
}

impl ChannelResolver {
    pub fn new(source: Arc<dyn PageSource>, config: &YoutubeConfig) -> Self {
        Self {
            source,
            base_url: config.base().to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Resolve a channel URL, handle (`@name`) or custom URL.
    ///
    /// Failures are logged at `warn` before they are returned.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedChannel, ResolveError> {
        let input = input.trim();
        self.resolve_trimmed(input)
            .await
            .inspect_err(|e| warn!(input = %input, error = %e, "Channel resolution failed"))
    }

    async fn resolve_trimmed(&self, input: &str) -> Result<ResolvedChannel, ResolveError> {
        if input.is_empty() {
            return Err(ResolveError::InvalidUrl("empty input".to_string()));
        }

        if let Some(channel_id) = extract_channel_id(input) {
            debug!(%channel_id, "Channel ID taken from URL");
            return Ok(self.describe(channel_id, None).await);
        }

        let page_url = self.normalize(input)?;
        let html = self
            .source
            .get_text(page_url.as_str(), Some(&self.user_agent))
            .await
            .map_err(ResolveError::PageFetchFailed)?;

        let channel_id = find_channel_id_in_page(&html).ok_or(ResolveError::IdNotFound)?;
        debug!(%channel_id, url = %page_url, "Channel ID found on page");

        Ok(self.describe(channel_id, find_page_thumbnail(&html)).await)
    }

    fn normalize(&self, input: &str) -> Result<Url, ResolveError> {
        let raw = if input.starts_with("http") {
            input.to_string()
        } else {
            format!("{}/{}", self.base_url, input.trim_start_matches('/'))
        };
        Url::parse(&raw).map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Fetch the channel feed once for its title; degrade to the raw id.
    async fn describe(&self, channel_id: String, thumbnail_url: Option<String>) -> ResolvedChannel {
        let url = feed_url(&self.base_url, &channel_id);

        let title = match self.source.get_text(&url, None).await {
            Ok(body) => match parse_feed(body.as_bytes(), &channel_id) {
                Ok(feed) => feed.channel_title.filter(|t| !t.trim().is_empty()),
                Err(e) => {
                    warn!(%channel_id, error = %e, "Channel feed unreadable");
                    None
                }
            },
            Err(e) => {
                warn!(%channel_id, error = %e, "Channel feed unavailable");
                None
            }
        };

        match title {
            Some(title) => ResolvedChannel {
                channel_id,
                title,
                thumbnail_url,
            },
            None => ResolvedChannel {
                title: channel_id.clone(),
                channel_id,
                thumbnail_url: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::testing::{feed_xml, FakePageSource};

    const BASE: &str = "https://yt.test";
    const ID: &str = "UCabcdefghijklmnopqrstuv";

    fn config() -> YoutubeConfig {
        YoutubeConfig {
            base_url: BASE.to_string(),
            ..YoutubeConfig::default()
        }
    }

    fn resolver(source: FakePageSource) -> (ChannelResolver, Arc<FakePageSource>) {
        let source = Arc::new(source);
        (ChannelResolver::new(source.clone(), &config()), source)
    }

    #[test]
    fn test_extract_channel_id() {
        assert_eq!(
            extract_channel_id(&format!("https://x.com/channel/{}", ID)).as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_channel_id(&format!("https://www.youtube.com/channel/{}/videos", ID)).as_deref(),
            Some(ID)
        );
        assert_eq!(extract_channel_id("https://www.youtube.com/@someone"), None);
        assert_eq!(extract_channel_id("https://www.youtube.com/channel/UCshort"), None);
    }

    #[test]
    fn test_looks_like_channel_url() {
        assert!(looks_like_channel_url("https://www.youtube.com/@someone"));
        assert!(looks_like_channel_url("http://youtube.com/c/Custom"));
        assert!(looks_like_channel_url("HTTPS://WWW.YOUTUBE.COM/user/legacy"));
        assert!(looks_like_channel_url(&format!(
            "https://m.youtube.com/channel/{}",
            ID
        )));
        assert!(!looks_like_channel_url("https://www.youtube.com/watch?v=abc"));
        assert!(!looks_like_channel_url("https://vimeo.com/@someone"));
        assert!(!looks_like_channel_url("@someone"));
    }

    #[test]
    fn test_find_channel_id_pattern_priority() {
        let other = "UCzzzzzzzzzzzzzzzzzzzzzz";
        let html = format!(
            r#"<a href="/channel/{}">x</a> {{"channelId":"{}"}}"#,
            other, ID
        );
        assert_eq!(find_channel_id_in_page(&html).as_deref(), Some(ID));

        let html = format!(
            r#"<link href="feeds?channel_id={}"> <a href="/channel/{}">"#,
            ID, other
        );
        assert_eq!(find_channel_id_in_page(&html).as_deref(), Some(ID));

        assert_eq!(find_channel_id_in_page("<html></html>"), None);
    }

    #[tokio::test]
    async fn test_resolve_direct_url_skips_page_fetch() {
        let (resolver, source) =
            resolver(FakePageSource::new().with_feed(BASE, ID, &feed_xml("Direct Channel", &[])));

        let channel = resolver
            .resolve(&format!("https://www.youtube.com/channel/{}", ID))
            .await
            .unwrap();

        assert_eq!(channel.channel_id, ID);
        assert_eq!(channel.title, "Direct Channel");
        assert_eq!(channel.thumbnail_url, None);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_handle_from_page() {
        let page = format!(
            r#"<html><head><meta property="og:image" content="https://yt3.test/avatar.jpg"></head>
<body><script>var data = {{"channelId":"{}"}};</script></body></html>"#,
            ID
        );
        let (resolver, source) = resolver(
            FakePageSource::new()
                .with_page(&format!("{}/@someone", BASE), &page)
                .with_feed(BASE, ID, &feed_xml("Some One", &[])),
        );

        let channel = resolver.resolve("@someone").await.unwrap();

        assert_eq!(channel.channel_id, ID);
        assert_eq!(channel.title, "Some One");
        assert_eq!(
            channel.thumbnail_url.as_deref(),
            Some("https://yt3.test/avatar.jpg")
        );
        assert_eq!(
            source.user_agents()[0].as_deref(),
            Some("Mozilla/5.0 (compatible; YTOrganizer/1.0)")
        );
    }

    #[tokio::test]
    async fn test_resolve_title_degrades_to_id() {
        let page = format!(r#"<a href="/channel/{}">"#, ID);
        let (resolver, _) = resolver(
            FakePageSource::new()
                .with_page(&format!("{}/c/Custom", BASE), &page)
                .with_status(BASE, ID, 500),
        );

        let channel = resolver
            .resolve(&format!("{}/c/Custom", BASE))
            .await
            .unwrap();

        assert_eq!(channel.channel_id, ID);
        assert_eq!(channel.title, ID);
        assert_eq!(channel.thumbnail_url, None);
    }

    #[tokio::test]
    async fn test_resolve_page_fetch_failed() {
        let (resolver, _) = resolver(FakePageSource::new());

        let err = resolver.resolve("@missing").await.unwrap_err();
        assert_eq!(err, ResolveError::PageFetchFailed(FetchError::Status(404)));
        assert!(err.to_string().contains("404"));
    }

    /// Collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_resolve_failure_is_logged() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (resolver, _) = resolver(FakePageSource::new());
        resolver.resolve("@missing").await.unwrap_err();

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Channel resolution failed"));
        assert!(output.contains("@missing"));
        assert!(output.contains("404"));
    }

    #[tokio::test]
    async fn test_resolve_id_not_found() {
        let (resolver, _) = resolver(
            FakePageSource::new().with_page(&format!("{}/@nobody", BASE), "<html>nothing</html>"),
        );

        assert_eq!(
            resolver.resolve("@nobody").await.unwrap_err(),
            ResolveError::IdNotFound
        );
    }

    #[tokio::test]
    async fn test_resolve_invalid_input() {
        let (resolver, source) = resolver(FakePageSource::new());

        assert!(matches!(
            resolver.resolve("   ").await,
            Err(ResolveError::InvalidUrl(_))
        ));
        assert!(matches!(
            resolver.resolve("http://").await,
            Err(ResolveError::InvalidUrl(_))
        ));
        assert_eq!(source.request_count(), 0);
    }
}
