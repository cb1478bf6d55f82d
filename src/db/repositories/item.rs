//! Item repository
//!
//! Database operations for the four content item kinds. Each kind lives in
//! its own table; a `(kind, id)` reference is resolved by matching on the
//! kind and querying the one table it names. The four tables share the same
//! metadata columns and differ only in the payload column.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ContentItem, FileItem, ImageItem, ItemKind, ItemMeta, TextItem, VideoItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Item repository trait
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Create an item of the given kind; `payload` is the kind's single
    /// payload value (text content, stored path, or URL)
    async fn create(
        &self,
        kind: ItemKind,
        owner_id: i64,
        title: &str,
        payload: &str,
    ) -> Result<ContentItem>;

    /// Resolve a `(kind, id)` reference to its item, if it exists
    async fn get(&self, kind: ItemKind, id: i64) -> Result<Option<ContentItem>>;

    /// List all items of one kind owned by a user
    async fn list_by_owner(&self, kind: ItemKind, owner_id: i64) -> Result<Vec<ContentItem>>;

    /// Delete an item (contents referencing it are untouched)
    async fn delete(&self, kind: ItemKind, id: i64) -> Result<()>;
}

/// SQLx-based item repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxItemRepository {
    pool: DynDatabasePool,
}

impl SqlxItemRepository {
    /// Create a new SQLx item repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ItemRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ItemRepository for SqlxItemRepository {
    async fn create(
        &self,
        kind: ItemKind,
        owner_id: i64,
        title: &str,
        payload: &str,
    ) -> Result<ContentItem> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), kind, owner_id, title, payload).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().unwrap(), kind, owner_id, title, payload).await
            }
        }
    }

    async fn get(&self, kind: ItemKind, id: i64) -> Result<Option<ContentItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_sqlite(self.pool.as_sqlite().unwrap(), kind, id).await,
            DatabaseDriver::Mysql => get_mysql(self.pool.as_mysql().unwrap(), kind, id).await,
        }
    }

    async fn list_by_owner(&self, kind: ItemKind, owner_id: i64) -> Result<Vec<ContentItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_owner_sqlite(self.pool.as_sqlite().unwrap(), kind, owner_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_owner_mysql(self.pool.as_mysql().unwrap(), kind, owner_id).await
            }
        }
    }

    async fn delete(&self, kind: ItemKind, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), kind, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), kind, id).await,
        }
    }
}

/// Payload column name for a kind's table
fn payload_column(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Text => "content",
        ItemKind::File | ItemKind::Image => "file",
        ItemKind::Video => "url",
    }
}

fn insert_sql(kind: ItemKind) -> String {
    format!(
        "INSERT INTO {} (owner_id, title, {}) VALUES (?, ?, ?)",
        kind.table(),
        payload_column(kind)
    )
}

fn select_sql(kind: ItemKind, filter: &str) -> String {
    format!(
        "SELECT id, owner_id, title, {} AS payload, created_at, updated_at FROM {} WHERE {}",
        payload_column(kind),
        kind.table(),
        filter
    )
}

/// Assemble the tagged union variant from shared metadata and the payload
fn build_item(kind: ItemKind, meta: ItemMeta, payload: String) -> ContentItem {
    match kind {
        ItemKind::Text => ContentItem::Text(TextItem {
            meta,
            content: payload,
        }),
        ItemKind::File => ContentItem::File(FileItem {
            meta,
            file: payload,
        }),
        ItemKind::Image => ContentItem::Image(ImageItem {
            meta,
            file: payload,
        }),
        ItemKind::Video => ContentItem::Video(VideoItem { meta, url: payload }),
    }
}

// SQLite implementations

async fn create_sqlite(
    pool: &SqlitePool,
    kind: ItemKind,
    owner_id: i64,
    title: &str,
    payload: &str,
) -> Result<ContentItem> {
    let result = sqlx::query(&insert_sql(kind))
        .bind(owner_id)
        .bind(title)
        .bind(payload)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create {} item", kind))?;

    get_sqlite(pool, kind, result.last_insert_rowid())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Item not found after insert"))
}

async fn get_sqlite(pool: &SqlitePool, kind: ItemKind, id: i64) -> Result<Option<ContentItem>> {
    let row = sqlx::query(&select_sql(kind, "id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to get {} item", kind))?;
    Ok(row.map(|r| row_to_item_sqlite(kind, &r)))
}

async fn list_by_owner_sqlite(
    pool: &SqlitePool,
    kind: ItemKind,
    owner_id: i64,
) -> Result<Vec<ContentItem>> {
    let rows = sqlx::query(&format!("{} ORDER BY id", select_sql(kind, "owner_id = ?")))
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to list {} items", kind))?;
    Ok(rows.iter().map(|r| row_to_item_sqlite(kind, r)).collect())
}

async fn delete_sqlite(pool: &SqlitePool, kind: ItemKind, id: i64) -> Result<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
        .bind(id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete {} item", kind))?;
    Ok(())
}

fn row_to_item_sqlite(kind: ItemKind, row: &sqlx::sqlite::SqliteRow) -> ContentItem {
    let meta = ItemMeta {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };
    build_item(kind, meta, row.get("payload"))
}

// MySQL implementations

async fn create_mysql(
    pool: &MySqlPool,
    kind: ItemKind,
    owner_id: i64,
    title: &str,
    payload: &str,
) -> Result<ContentItem> {
    let result = sqlx::query(&insert_sql(kind))
        .bind(owner_id)
        .bind(title)
        .bind(payload)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create {} item", kind))?;

    get_mysql(pool, kind, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Item not found after insert"))
}

async fn get_mysql(pool: &MySqlPool, kind: ItemKind, id: i64) -> Result<Option<ContentItem>> {
    let row = sqlx::query(&select_sql(kind, "id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to get {} item", kind))?;
    Ok(row.map(|r| row_to_item_mysql(kind, &r)))
}

async fn list_by_owner_mysql(
    pool: &MySqlPool,
    kind: ItemKind,
    owner_id: i64,
) -> Result<Vec<ContentItem>> {
    let rows = sqlx::query(&format!("{} ORDER BY id", select_sql(kind, "owner_id = ?")))
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to list {} items", kind))?;
    Ok(rows.iter().map(|r| row_to_item_mysql(kind, r)).collect())
}

async fn delete_mysql(pool: &MySqlPool, kind: ItemKind, id: i64) -> Result<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
        .bind(id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete {} item", kind))?;
    Ok(())
}

fn row_to_item_mysql(kind: ItemKind, row: &sqlx::mysql::MySqlRow) -> ContentItem {
    let meta = ItemMeta {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };
    build_item(kind, meta, row.get("payload"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlxItemRepository, i64) {
        let pool = create_test_pool().await.expect("test pool");
        migrations::run_migrations(&pool).await.expect("migrations");

        let owner = SqlxUserRepository::new(pool.clone())
            .create("amy", "amy@example.com")
            .await
            .expect("owner");

        (SqlxItemRepository::new(pool), owner.id)
    }

    #[tokio::test]
    async fn test_create_resolves_to_matching_variant() {
        let (repo, owner_id) = setup().await;

        let text = repo
            .create(ItemKind::Text, owner_id, "Notes", "Hello")
            .await
            .expect("create");
        match &text {
            ContentItem::Text(item) => {
                assert_eq!(item.content, "Hello");
                assert_eq!(item.meta.title, "Notes");
            }
            other => panic!("expected text item, got {:?}", other),
        }

        let video = repo
            .create(ItemKind::Video, owner_id, "Lecture", "https://example.com/v")
            .await
            .expect("create");
        assert_eq!(video.kind(), ItemKind::Video);
    }

    #[tokio::test]
    async fn test_ids_are_independent_per_kind() {
        let (repo, owner_id) = setup().await;

        let text = repo.create(ItemKind::Text, owner_id, "T", "x").await.expect("create");
        let file = repo.create(ItemKind::File, owner_id, "F", "a.pdf").await.expect("create");

        // Separate tables, separate sequences: both start at 1
        assert_eq!(text.meta().id, 1);
        assert_eq!(file.meta().id, 1);

        // And a (kind, id) pair only resolves within its own table
        let resolved = repo.get(ItemKind::File, 1).await.expect("get").expect("some");
        assert_eq!(resolved.kind(), ItemKind::File);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (repo, _) = setup().await;
        let missing = repo.get(ItemKind::Image, 99).await.expect("get");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_and_delete() {
        let (repo, owner_id) = setup().await;
        repo.create(ItemKind::Image, owner_id, "A", "a.png").await.expect("create");
        let b = repo.create(ItemKind::Image, owner_id, "B", "b.png").await.expect("create");

        let items = repo.list_by_owner(ItemKind::Image, owner_id).await.expect("list");
        assert_eq!(items.len(), 2);

        repo.delete(ItemKind::Image, b.meta().id).await.expect("delete");
        let items = repo.list_by_owner(ItemKind::Image, owner_id).await.expect("list");
        assert_eq!(items.len(), 1);
    }
}
