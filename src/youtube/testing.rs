//! Canned provider responses for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::youtube::client::{FetchError, PageSource};
use crate::youtube::types::feed_url;

/// [`PageSource`] that answers from a URL map. Unknown URLs return 404.
#[derive(Default)]
pub struct FakePageSource {
    pages: HashMap<String, Result<String, FetchError>>,
    requests: AtomicUsize,
    user_agents: Mutex<Vec<Option<String>>>,
}

impl FakePageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn with_feed(self, base: &str, channel_id: &str, xml: &str) -> Self {
        self.with_page(&feed_url(base, channel_id), xml)
    }

    pub fn with_status(self, base: &str, channel_id: &str, status: u16) -> Self {
        self.with_error(&feed_url(base, channel_id), FetchError::Status(status))
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<Option<String>> {
        self.user_agents.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn get_text(&self, url: &str, user_agent: Option<&str>) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.user_agents
            .lock()
            .unwrap()
            .push(user_agent.map(str::to_string));
        self.pages
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

/// Minimal channel feed with `(video_id, published)` entries.
pub fn feed_xml(title: &str, entries: &[(&str, Option<&str>)]) -> String {
    let mut body = String::new();
    for (video_id, published) in entries {
        body.push_str(&format!(
            "<entry><id>yt:video:{id}</id><title>Video {id}</title>",
            id = video_id
        ));
        if let Some(published) = published {
            body.push_str(&format!("<published>{}</published>", published));
        }
        body.push_str("</entry>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/"><title>{}</title>{}</feed>"#,
        title, body
    )
}
