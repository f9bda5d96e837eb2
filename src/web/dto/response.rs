//! Response DTOs for the REST API.

use serde::Serialize;

use crate::library::{Category, Channel};
use crate::youtube::Video;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Channel in responses.
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    /// When the channel was added (RFC 3339).
    pub created_at: String,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            channel_id: channel.channel_id,
            title: channel.title,
            thumbnail_url: channel.thumbnail_url,
            created_at: channel.created_at.to_rfc3339(),
        }
    }
}

/// Category in responses.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub sort_order: i64,
    pub channel_ids: Vec<String>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
            sort_order: category.sort_order,
            channel_ids: category.channel_ids,
        }
    }
}

/// Video in feed responses.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub channel_id: String,
    pub channel_title: String,
    /// Publication time (RFC 3339), null when the feed had none.
    pub published_at: Option<String>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            channel_id: video.channel_id,
            channel_title: video.channel_title,
            published_at: video.published_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
