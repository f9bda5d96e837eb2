//! Library types for ytshelf.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::youtube::ResolvedChannel;

/// Category color palette, in assignment order.
pub const CATEGORY_COLORS: [&str; 10] = [
    "#EF4444", "#F97316", "#EAB308", "#22C55E", "#06B6D4", "#3B82F6", "#8B5CF6", "#EC4899",
    "#6366F1", "#14B8A6",
];

/// Maximum category name length in characters.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// A channel in a user's library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    /// Row ID.
    pub id: i64,
    /// Provider channel ID.
    pub channel_id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// When the channel was first added.
    pub created_at: DateTime<Utc>,
}

/// Data for adding or refreshing a channel.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

impl NewChannel {
    pub fn new(channel_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: title.into(),
            thumbnail_url: None,
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }
}

impl From<ResolvedChannel> for NewChannel {
    fn from(resolved: ResolvedChannel) -> Self {
        Self {
            channel_id: resolved.channel_id,
            title: resolved.title,
            thumbnail_url: resolved.thumbnail_url,
        }
    }
}

/// A user-defined category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Palette color (`#RRGGBB`).
    pub color: String,
    /// Position in the category list, starting at 1.
    pub sort_order: i64,
    /// Assigned channels, derived from assignments on every load.
    pub channel_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// First palette color not already used, or the first color when all are.
pub fn pick_color<S: AsRef<str>>(used: &[S]) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .copied()
        .find(|color| !used.iter().any(|u| u.as_ref().eq_ignore_ascii_case(color)))
        .unwrap_or(CATEGORY_COLORS[0])
}
