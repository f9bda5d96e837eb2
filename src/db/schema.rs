//! Database schema and migrations for ytshelf.
//!
//! Migrations run in order; the schema_version table records which ones
//! have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: channels, categories and assignments
    r#"
-- Channels a user has added
CREATE TABLE channels (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        TEXT NOT NULL,           -- token subject (e-mail)
    channel_id     TEXT NOT NULL,           -- provider channel ID
    title          TEXT NOT NULL,
    thumbnail_url  TEXT,
    created_at     TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, channel_id)
);

CREATE INDEX idx_channels_user_id ON channels(user_id);

-- User-defined categories
CREATE TABLE categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    name        TEXT NOT NULL,
    color       TEXT NOT NULL,
    sort_order  INTEGER NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_categories_user_sort ON categories(user_id, sort_order);

-- A channel belongs to at most one category per user
CREATE TABLE channel_assignments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    category_id  INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    channel_id   TEXT NOT NULL,
    created_at   TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, channel_id),
    FOREIGN KEY (user_id, channel_id)
        REFERENCES channels(user_id, channel_id) ON DELETE CASCADE
);

CREATE INDEX idx_channel_assignments_category ON channel_assignments(category_id);
"#,
];
