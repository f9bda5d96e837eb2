//! HTTP access to the provider.
//!
//! The resolver and the fetcher only see [`PageSource`], so tests can swap
//! the network for canned responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use thiserror::Error;

use crate::config::YoutubeConfig;
use crate::{Result, ShelfError};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Failure of a single GET.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Response exceeded the size limit.
    #[error("response too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Source of page and feed bodies.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// GET `url` and return the body text, optionally overriding the User-Agent.
    async fn get_text(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> std::result::Result<String, FetchError>;
}

/// [`PageSource`] backed by reqwest.
pub struct HttpPageSource {
    client: Client,
    max_size: u64,
}

impl HttpPageSource {
    /// Create a client with the configured timeout and size limit.
    pub fn new(config: &YoutubeConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ShelfError::Upstream(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_size: config.max_feed_size_bytes,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get_text(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> std::result::Result<String, FetchError> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size {
                return Err(FetchError::TooLarge {
                    size: content_length,
                    max: self.max_size,
                });
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if bytes.len() as u64 > self.max_size {
            return Err(FetchError::TooLarge {
                size: bytes.len() as u64,
                max: self.max_size,
            });
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
