//! ytshelf - personal YouTube subscription organizer.
//!
//! Channels are grouped into categories and each category gets a merged,
//! newest-first video feed built from the public channel feeds.

pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod logging;
pub mod web;
pub mod youtube;

pub use config::Config;
pub use db::Database;
pub use error::{Result, ShelfError};
pub use library::{Category, Channel, LibraryService, NewChannel};
pub use youtube::{
    extract_channel_id, ChannelResolver, FeedCache, FeedFetcher, FeedService, PageSource,
    ResolveError, ResolvedChannel, Video,
};
