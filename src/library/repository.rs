//! Library repositories for ytshelf.
//!
//! Every query is scoped by the owning user's identity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::types::{pick_color, Category, Channel, NewChannel};
use crate::{Result, ShelfError};

/// Row type for channel from database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChannelRow {
    id: i64,
    channel_id: String,
    title: String,
    thumbnail_url: Option<String>,
    created_at: String,
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        Channel {
            id: row.id,
            channel_id: row.channel_id,
            title: row.title,
            thumbnail_url: row.thumbnail_url,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Row type for category from database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    color: String,
    sort_order: i64,
    created_at: String,
}

impl CategoryRow {
    fn into_category(self, channel_ids: Vec<String>) -> Category {
        Category {
            id: self.id,
            name: self.name,
            color: self.color,
            sort_order: self.sort_order,
            channel_ids,
            created_at: parse_datetime(&self.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for channel operations.
pub struct ChannelRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ChannelRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's channels in the order they were added.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Channel>> {
        let rows = sqlx::query_as::<_, ChannelRow>(
            r#"
            SELECT id, channel_id, title, thumbnail_url, created_at
            FROM channels
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Channel::from).collect())
    }

    /// Get a channel by provider ID.
    pub async fn get(&self, user_id: &str, channel_id: &str) -> Result<Option<Channel>> {
        let row = sqlx::query_as::<_, ChannelRow>(
            r#"
            SELECT id, channel_id, title, thumbnail_url, created_at
            FROM channels
            WHERE user_id = ? AND channel_id = ?
            "#,
        )
        .bind(user_id)
        .bind(channel_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(row.map(Channel::from))
    }

    /// Insert a channel, or refresh title and thumbnail if it already exists.
    pub async fn upsert(&self, user_id: &str, channel: &NewChannel) -> Result<Channel> {
        sqlx::query(
            r#"
            INSERT INTO channels (user_id, channel_id, title, thumbnail_url)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, channel_id) DO UPDATE SET
                title = excluded.title,
                thumbnail_url = excluded.thumbnail_url
            "#,
        )
        .bind(user_id)
        .bind(&channel.channel_id)
        .bind(&channel.title)
        .bind(&channel.thumbnail_url)
        .execute(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        self.get(user_id, &channel.channel_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("channel".to_string()))
    }

    /// Delete a channel. Returns false if it did not exist.
    pub async fn delete(&self, user_id: &str, channel_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM channels WHERE user_id = ? AND channel_id = ?")
            .bind(user_id)
            .bind(channel_id)
            .execute(self.pool)
            .await
            .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Provider IDs of channels without a category, in the order they were added.
    pub async fn list_uncategorized_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT c.channel_id
            FROM channels c
            LEFT JOIN channel_assignments a
                ON a.user_id = c.user_id AND a.channel_id = c.channel_id
            WHERE c.user_id = ? AND a.id IS NULL
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(ids)
    }
}

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's categories by sort position, with their channel IDs.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, color, sort_order, created_at
            FROM categories
            WHERE user_id = ?
            ORDER BY sort_order, id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        let assignments = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT a.category_id, a.channel_id
            FROM channel_assignments a
            JOIN channels c ON c.user_id = a.user_id AND c.channel_id = a.channel_id
            WHERE a.user_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        let mut by_category: HashMap<i64, Vec<String>> = HashMap::new();
        for (category_id, channel_id) in assignments {
            by_category.entry(category_id).or_default().push(channel_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let channel_ids = by_category.remove(&row.id).unwrap_or_default();
                row.into_category(channel_ids)
            })
            .collect())
    }

    /// Get a category by ID.
    pub async fn get(&self, user_id: &str, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, color, sort_order, created_at
            FROM categories
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        match row {
            Some(row) => {
                let channel_ids = self.channel_ids(user_id, id).await?;
                Ok(Some(row.into_category(channel_ids)))
            }
            None => Ok(None),
        }
    }

    /// Create a category with the next palette color and sort position.
    pub async fn create(&self, user_id: &str, name: &str) -> Result<Category> {
        let mut tx = self.pool.begin().await?;

        let used_colors =
            sqlx::query_scalar::<_, String>("SELECT color FROM categories WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| ShelfError::Database(e.to_string()))?;

        let max_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order), 0) FROM categories WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO categories (user_id, name, color, sort_order)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(pick_color(&used_colors))
        .bind(max_order + 1)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        tx.commit().await?;

        self.get(user_id, id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("category".to_string()))
    }

    /// Rename a category. Returns false if it does not exist.
    pub async fn rename(&self, user_id: &str, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE user_id = ? AND id = ?")
            .bind(name)
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a category and its assignments. Channels are kept.
    pub async fn delete(&self, user_id: &str, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Provider IDs of the channels assigned to a category.
    pub async fn channel_ids(&self, user_id: &str, id: i64) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT a.channel_id
            FROM channel_assignments a
            JOIN channels c ON c.user_id = a.user_id AND c.channel_id = a.channel_id
            WHERE a.user_id = ? AND a.category_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(ids)
    }
}

/// Repository for channel-to-category assignments.
pub struct AssignmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AssignmentRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Put a channel in a category, moving it out of any other.
    pub async fn assign(&self, user_id: &str, category_id: i64, channel_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_assignments (user_id, category_id, channel_id)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, channel_id) DO UPDATE SET
                category_id = excluded.category_id
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .bind(channel_id)
        .execute(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove a channel's assignment. Returns false if it had none.
    pub async fn unassign(&self, user_id: &str, channel_id: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM channel_assignments WHERE user_id = ? AND channel_id = ?")
                .bind(user_id)
                .bind(channel_id)
                .execute(self.pool)
                .await
                .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    #[cfg(test)]
    pub async fn category_of(&self, user_id: &str, channel_id: &str) -> Result<Option<i64>> {
        let category_id = sqlx::query_scalar::<_, i64>(
            "SELECT category_id FROM channel_assignments WHERE user_id = ? AND channel_id = ?",
        )
        .bind(user_id)
        .bind(channel_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ShelfError::Database(e.to_string()))?;

        Ok(category_id)
    }
}

/// Parse a datetime string from the database.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}
