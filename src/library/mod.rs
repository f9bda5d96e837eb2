//! Channel library for ytshelf.
//!
//! Per-user channels, categories and the assignment between them.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::{AssignmentRepository, CategoryRepository, ChannelRepository};
pub use service::LibraryService;
pub use types::{
    pick_color, Category, Channel, NewChannel, CATEGORY_COLORS, MAX_CATEGORY_NAME_LENGTH,
};
