//! Library service for ytshelf.
//!
//! Channel and category operations for one user, with existence checks
//! and input validation on top of the repositories.

use sqlx::SqlitePool;
use tracing::info;

use super::repository::{AssignmentRepository, CategoryRepository, ChannelRepository};
use super::types::{Category, Channel, NewChannel, MAX_CATEGORY_NAME_LENGTH};
use crate::{Result, ShelfError};

/// Service for a single user's channels and categories.
pub struct LibraryService<'a> {
    pool: &'a SqlitePool,
    user_id: &'a str,
}

impl<'a> LibraryService<'a> {
    /// Create a service scoped to `user_id`.
    pub fn new(pool: &'a SqlitePool, user_id: &'a str) -> Self {
        Self { pool, user_id }
    }

    /// List channels in the order they were added.
    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        ChannelRepository::new(self.pool).list(self.user_id).await
    }

    /// Add a channel, or refresh its metadata if already present.
    ///
    /// With `category_id`, the channel is also assigned. The category is
    /// checked before anything is written.
    pub async fn add_channel(
        &self,
        channel: &NewChannel,
        category_id: Option<i64>,
    ) -> Result<Channel> {
        if let Some(category_id) = category_id {
            self.require_category(category_id).await?;
        }

        let added = ChannelRepository::new(self.pool)
            .upsert(self.user_id, channel)
            .await?;

        if let Some(category_id) = category_id {
            AssignmentRepository::new(self.pool)
                .assign(self.user_id, category_id, &added.channel_id)
                .await?;
        }

        info!(user = self.user_id, channel_id = %added.channel_id, "Channel added");
        Ok(added)
    }

    /// Remove a channel and its assignment.
    pub async fn remove_channel(&self, channel_id: &str) -> Result<()> {
        self.require_channel(channel_id).await?;

        AssignmentRepository::new(self.pool)
            .unassign(self.user_id, channel_id)
            .await?;
        ChannelRepository::new(self.pool)
            .delete(self.user_id, channel_id)
            .await?;

        info!(user = self.user_id, channel_id, "Channel removed");
        Ok(())
    }

    /// List categories by sort position.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        CategoryRepository::new(self.pool).list(self.user_id).await
    }

    /// Get a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not belong to this user.
    pub async fn category(&self, id: i64) -> Result<Category> {
        self.require_category(id).await
    }

    /// Create a category.
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = validate_category_name(name)?;
        let category = CategoryRepository::new(self.pool)
            .create(self.user_id, name)
            .await?;

        info!(user = self.user_id, category_id = category.id, "Category created");
        Ok(category)
    }

    /// Rename a category.
    pub async fn rename_category(&self, id: i64, name: &str) -> Result<Category> {
        let name = validate_category_name(name)?;
        let repo = CategoryRepository::new(self.pool);

        if !repo.rename(self.user_id, id, name).await? {
            return Err(ShelfError::NotFound("category".to_string()));
        }
        self.require_category(id).await
    }

    /// Delete a category. Its channels become uncategorized.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        if !CategoryRepository::new(self.pool)
            .delete(self.user_id, id)
            .await?
        {
            return Err(ShelfError::NotFound("category".to_string()));
        }

        info!(user = self.user_id, category_id = id, "Category deleted");
        Ok(())
    }

    /// Put a channel in a category, moving it out of any other.
    pub async fn assign(&self, category_id: i64, channel_id: &str) -> Result<()> {
        self.require_category(category_id).await?;
        self.require_channel(channel_id).await?;

        AssignmentRepository::new(self.pool)
            .assign(self.user_id, category_id, channel_id)
            .await
    }

    /// Take a channel out of its category. A no-op if it has none.
    pub async fn unassign(&self, channel_id: &str) -> Result<()> {
        self.require_channel(channel_id).await?;

        AssignmentRepository::new(self.pool)
            .unassign(self.user_id, channel_id)
            .await?;
        Ok(())
    }

    /// Channel IDs assigned to a category.
    pub async fn category_channel_ids(&self, id: i64) -> Result<Vec<String>> {
        Ok(self.require_category(id).await?.channel_ids)
    }

    /// Channel IDs with no category, in the order they were added.
    pub async fn uncategorized_channel_ids(&self) -> Result<Vec<String>> {
        ChannelRepository::new(self.pool)
            .list_uncategorized_ids(self.user_id)
            .await
    }

    async fn require_category(&self, id: i64) -> Result<Category> {
        CategoryRepository::new(self.pool)
            .get(self.user_id, id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("category".to_string()))
    }

    async fn require_channel(&self, channel_id: &str) -> Result<Channel> {
        ChannelRepository::new(self.pool)
            .get(self.user_id, channel_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("channel".to_string()))
    }
}

fn validate_category_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ShelfError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(ShelfError::Validation(format!(
            "name must be at most {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(name)
}
