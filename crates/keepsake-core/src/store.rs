//! Unified storage interface
//!
//! The `Store` owns the SQLite connection and is the single write path for
//! both tables:
//!
//! - `items`: captured content, tags carried on the row as a JSON array
//! - `tags`: one row per unique tag name with a denormalized usage counter
//!
//! ## Tag counters
//!
//! `tags.usage_count` is derived from the items currently listing each tag
//! name. It is maintained incrementally: whenever an item's tag set changes
//! (update or delete), the item row and the affected tag rows are written in
//! one transaction. Counter adjustments are single SQL statements, never
//! read-modify-write. Tag rows are created lazily on first use and are never
//! deleted, even at zero usage.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let item = store.create_item(&NewItem::new(ContentType::Text, "hello"))?;
//! store.update_item(item.id, ItemPatch {
//!     tags: Some(vec!["inbox".into()]),
//!     ..Default::default()
//! })?;
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql, Transaction};
use tracing::debug;

use crate::config::Config;
use crate::models::{CapturedItem, ContentType, ItemPatch, NewItem, SearchQuery, Tag};
use crate::storage::schema::{init_schema, needs_init};
use crate::storage::{StoreError, StoreResult};

/// Columns selected for every item query, in `read_item` order
const ITEM_COLUMNS: &str =
    "id, content_type, content, title, description, tags, metadata, created_at, updated_at";

/// Unified storage interface for Keepsake
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config)?)
    }

    /// Open the store at the location given by a configuration
    pub fn open_with_config(config: &Config) -> StoreResult<Self> {
        Self::open_at(&config.sqlite_path())
    }

    /// Open or create the SQLite database at a specific path
    pub fn open_at(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if needs_init(&conn) {
            init_schema(&conn)?;
        }
        Ok(Self { conn })
    }

    // ==================== Item Operations ====================

    /// Create a new item
    ///
    /// Items always start with an empty tag set; tags are attached through
    /// [`Store::update_item`] so the tag counters have a single write path.
    pub fn create_item(&mut self, input: &NewItem) -> StoreResult<CapturedItem> {
        if input.content.is_empty() {
            return Err(StoreError::Validation(
                "content cannot be empty".to_string(),
            ));
        }

        let now = now_millis();
        let metadata_json = input
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            r#"
            INSERT INTO items (content_type, content, title, description, tags, metadata, created_at, updated_at)
            VALUES (?, ?, ?, ?, '[]', ?, ?, ?)
            "#,
            params![
                input.content_type.as_str(),
                input.content,
                input.title,
                input.description,
                metadata_json,
                now.timestamp_millis(),
                now.timestamp_millis(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, content_type = %input.content_type, "created item");

        Ok(CapturedItem {
            id,
            content_type: input.content_type,
            content: input.content.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            tags: Vec::new(),
            metadata: input.metadata.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an item by id, or `None` if it does not exist
    pub fn get_item(&self, id: i64) -> StoreResult<Option<CapturedItem>> {
        fetch_item(&self.conn, id)
    }

    /// Get all items in natural storage order
    pub fn get_all_items(&self) -> StoreResult<Vec<CapturedItem>> {
        query_items(
            &self.conn,
            &format!("SELECT {} FROM items", ITEM_COLUMNS),
            params![],
        )
    }

    /// Update an item
    ///
    /// Fields present in the patch are changed, absent fields are left
    /// untouched. When `tags` is provided the tag usage counters are
    /// adjusted for the difference between the old and new tag sets, in the
    /// same transaction as the item row. `updated_at` is refreshed whether
    /// or not anything changed.
    pub fn update_item(&mut self, id: i64, patch: ItemPatch) -> StoreResult<CapturedItem> {
        if let Some(ref content) = patch.content {
            if content.is_empty() {
                return Err(StoreError::Validation(
                    "content cannot be empty".to_string(),
                ));
            }
        }

        let tx = self.conn.transaction()?;

        let existing = fetch_item(&tx, id)?.ok_or(StoreError::NotFound { id })?;
        let now = now_millis();

        let content_type = patch.content_type.unwrap_or(existing.content_type);
        let content = patch.content.unwrap_or(existing.content);
        let title = patch.title.unwrap_or(existing.title);
        let description = patch.description.unwrap_or(existing.description);
        let metadata = patch.metadata.unwrap_or(existing.metadata);

        let tags_changed = patch.tags.is_some();
        let tags = match patch.tags {
            Some(ref new_tags) => dedup_tags(new_tags),
            None => existing.tags.clone(),
        };

        if tags_changed {
            let (removed, added) = tag_diff(&existing.tags, &tags);
            retire_tags(&tx, &removed)?;
            record_tags(&tx, &added, now)?;
        }

        let metadata_json = metadata.as_ref().map(serde_json::to_string).transpose()?;

        tx.execute(
            r#"
            UPDATE items
            SET content_type = ?, content = ?, title = ?, description = ?,
                tags = ?, metadata = ?, updated_at = ?
            WHERE id = ?
            "#,
            params![
                content_type.as_str(),
                content,
                title,
                description,
                serde_json::to_string(&tags)?,
                metadata_json,
                now.timestamp_millis(),
                id,
            ],
        )?;

        let updated = fetch_item(&tx, id)?.ok_or(StoreError::NotFound { id })?;
        tx.commit()?;

        debug!(id, tags_changed, "updated item");
        Ok(updated)
    }

    /// Delete an item, retiring its tag contributions
    pub fn delete_item(&mut self, id: i64) -> StoreResult<()> {
        let tx = self.conn.transaction()?;

        // The item's tags are needed for the decrement step, so read before
        // removing the row.
        let existing = fetch_item(&tx, id)?.ok_or(StoreError::NotFound { id })?;

        retire_tags(&tx, &existing.tags)?;
        tx.execute("DELETE FROM items WHERE id = ?", params![id])?;
        tx.commit()?;

        debug!(id, tag_count = existing.tags.len(), "deleted item");
        Ok(())
    }

    // ==================== Query Operations ====================

    /// Get items with an exact content type
    pub fn get_items_by_content_type(
        &self,
        content_type: ContentType,
    ) -> StoreResult<Vec<CapturedItem>> {
        query_items(
            &self.conn,
            &format!("SELECT {} FROM items WHERE content_type = ?", ITEM_COLUMNS),
            params![content_type.as_str()],
        )
    }

    /// Get items whose tag set intersects the requested names (overlap, OR)
    ///
    /// An empty request returns an empty result without touching the
    /// database.
    pub fn get_items_by_tags(&self, tags: &[String]) -> StoreResult<Vec<CapturedItem>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM items
             WHERE EXISTS (SELECT 1 FROM json_each(items.tags) WHERE json_each.value IN ({}))",
            ITEM_COLUMNS, placeholders
        );

        query_items(&self.conn, &sql, params_from_iter(tags.iter()))
    }

    /// Multi-filter search with pagination
    ///
    /// All provided filters apply conjunctively: case-insensitive substring
    /// match on `content`, exact content type, and tag containment (the item
    /// must carry every requested tag, distinct from the overlap semantics
    /// of [`Store::get_items_by_tags`]).
    pub fn search_items(&self, query: &SearchQuery) -> StoreResult<Vec<CapturedItem>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref text) = query.query {
            if !text.is_empty() {
                conditions.push("instr(lower(content), ?) > 0".to_string());
                values.push(Box::new(text.to_lowercase()));
            }
        }

        if let Some(content_type) = query.content_type {
            conditions.push("content_type = ?".to_string());
            values.push(Box::new(content_type.as_str()));
        }

        for tag in &query.tags {
            conditions
                .push("EXISTS (SELECT 1 FROM json_each(items.tags) WHERE json_each.value = ?)"
                    .to_string());
            values.push(Box::new(tag.clone()));
        }

        let mut sql = format!("SELECT {} FROM items", ITEM_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" LIMIT ? OFFSET ?");
        values.push(Box::new(query.limit as i64));
        values.push(Box::new(query.offset as i64));

        query_items(
            &self.conn,
            &sql,
            params_from_iter(values.iter().map(|v| v.as_ref())),
        )
    }

    /// Keyword search over content, title, and description, newest first
    ///
    /// The query is split on whitespace into lowercased terms; every term
    /// must appear as a case-insensitive substring in at least one of the
    /// three fields. An empty or whitespace-only query short-circuits to the
    /// `limit` most recent items, optionally narrowed by content type.
    ///
    /// Despite the feature's historical "semantic" name, this is literal
    /// keyword matching.
    pub fn semantic_search(
        &self,
        query: &str,
        limit: u32,
        content_type: Option<ContentType>,
    ) -> StoreResult<Vec<CapturedItem>> {
        let trimmed = query.trim();
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ct) = content_type {
            conditions.push("content_type = ?".to_string());
            values.push(Box::new(ct.as_str()));
        }

        if !trimmed.is_empty() {
            for term in trimmed.to_lowercase().split_whitespace() {
                conditions.push(
                    "(instr(lower(content), ?) > 0
                      OR instr(lower(coalesce(title, '')), ?) > 0
                      OR instr(lower(coalesce(description, '')), ?) > 0)"
                        .to_string(),
                );
                values.push(Box::new(term.to_string()));
                values.push(Box::new(term.to_string()));
                values.push(Box::new(term.to_string()));
            }
        }

        let mut sql = format!("SELECT {} FROM items", ITEM_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");
        values.push(Box::new(limit as i64));

        query_items(
            &self.conn,
            &sql,
            params_from_iter(values.iter().map(|v| v.as_ref())),
        )
    }

    // ==================== Tag Operations ====================

    /// Get all tags ordered by usage count, most used first
    pub fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, usage_count, created_at FROM tags
             ORDER BY usage_count DESC, name",
        )?;

        let tags = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags
            .into_iter()
            .map(|(id, name, usage_count, created_at)| Tag {
                id,
                name,
                usage_count,
                created_at: millis_to_datetime(created_at),
            })
            .collect())
    }

    // ==================== Stats ====================

    /// Get count of items
    pub fn item_count(&self) -> StoreResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Get count of tag rows (including zero-usage tags)
    pub fn tag_count(&self) -> StoreResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

// ==================== Tag bookkeeping ====================

/// Deduplicate a tag list, preserving order; first occurrence wins
fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

/// Set difference in both directions: `(removed, added)`
///
/// A name cannot be in both sets, so the counter adjustments commute.
fn tag_diff(old: &[String], new: &[String]) -> (Vec<String>, Vec<String>) {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    let removed = old
        .iter()
        .filter(|tag| !new_set.contains(tag.as_str()))
        .cloned()
        .collect();
    let added = new
        .iter()
        .filter(|tag| !old_set.contains(tag.as_str()))
        .cloned()
        .collect();

    (removed, added)
}

/// Decrement usage counters for names an item no longer carries
///
/// Absent tag rows are a no-op, not an error. The decrement clamps at zero
/// so a stale name can never drive a counter negative.
fn retire_tags(tx: &Transaction, names: &[String]) -> StoreResult<()> {
    for name in names {
        tx.execute(
            "UPDATE tags SET usage_count = max(usage_count - 1, 0) WHERE name = ?",
            params![name],
        )?;
    }
    Ok(())
}

/// Increment usage counters for newly attached names, creating rows lazily
fn record_tags(tx: &Transaction, names: &[String], now: DateTime<Utc>) -> StoreResult<()> {
    for name in names {
        tx.execute(
            "INSERT INTO tags (name, usage_count, created_at) VALUES (?, 1, ?)
             ON CONFLICT(name) DO UPDATE SET usage_count = usage_count + 1",
            params![name, now.timestamp_millis()],
        )?;
    }
    Ok(())
}

// ==================== Row mapping ====================

struct ItemRow {
    id: i64,
    content_type: String,
    content: String,
    title: Option<String>,
    description: Option<String>,
    tags: String,
    metadata: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn read_item(row: &rusqlite::Row) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        content_type: row.get(1)?,
        content: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        tags: row.get(5)?,
        metadata: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn hydrate_item(row: ItemRow) -> StoreResult<CapturedItem> {
    let content_type: ContentType = row.content_type.parse()?;
    let tags: Vec<String> = serde_json::from_str(&row.tags)?;
    let metadata = row
        .metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(CapturedItem {
        id: row.id,
        content_type,
        content: row.content,
        title: row.title,
        description: row.description,
        tags,
        metadata,
        created_at: millis_to_datetime(row.created_at),
        updated_at: millis_to_datetime(row.updated_at),
    })
}

fn fetch_item(conn: &Connection, id: i64) -> StoreResult<Option<CapturedItem>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
            params![id],
            read_item,
        )
        .optional()?;

    row.map(hydrate_item).transpose()
}

fn query_items<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StoreResult<Vec<CapturedItem>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, read_item)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(hydrate_item).collect()
}

/// Current time truncated to the stored millisecond precision
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    millis_to_datetime(now.timestamp_millis())
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}
