//! Request DTOs for the REST API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{category_name, not_empty_trimmed};

/// POST /api/channels body.
#[derive(Debug, Deserialize, Validate)]
pub struct AddChannelRequest {
    /// Channel URL or handle.
    #[validate(
        length(max = 2048, message = "URL is too long"),
        custom(function = "not_empty_trimmed")
    )]
    pub url: String,
    /// Category to put the channel in.
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<i64>,
}

/// POST /api/categories body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "category_name")
    )]
    pub name: String,
}

/// PATCH /api/categories/:id body.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "category_name")
    )]
    pub name: String,
}

/// GET /api/feed query.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Comma-separated channel IDs.
    #[serde(default, alias = "channelIds")]
    pub channel_ids: Option<String>,
}

impl FeedQuery {
    /// Channel IDs with blanks removed. Empty when the parameter is missing.
    pub fn ids(&self) -> Vec<String> {
        self.channel_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}
