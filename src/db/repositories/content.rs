//! Content repository
//!
//! Database operations for module contents. The `(item_kind, item_id)` pair
//! is stored as-is; item resolution lives in the item repository. Like
//! modules, a missing `order` on create is filled from the per-module
//! sequence.

use crate::config::DatabaseDriver;
use crate::db::{ordering, DynDatabasePool};
use crate::models::{Content, ItemKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Content repository trait
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Create a content row under a module, auto-assigning `order` when unset
    async fn create(
        &self,
        module_id: i64,
        item_kind: ItemKind,
        item_id: i64,
        order: Option<i32>,
    ) -> Result<Content>;

    /// Get content by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Content>>;

    /// List a module's contents in `order` sequence
    async fn list_by_module(&self, module_id: i64) -> Result<Vec<Content>>;

    /// Set a content's order explicitly (caller reassignment)
    async fn update_order(&self, id: i64, order: i32) -> Result<()>;

    /// Delete a content row (the referenced item is untouched)
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based content repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxContentRepository {
    pool: DynDatabasePool,
}

impl SqlxContentRepository {
    /// Create a new SQLx content repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepository {
    async fn create(
        &self,
        module_id: i64,
        item_kind: ItemKind,
        item_id: i64,
        order: Option<i32>,
    ) -> Result<Content> {
        // One sibling read, only when the caller left the order unset
        let order = match order {
            Some(order) => order,
            None => {
                ordering::next_order(&self.pool, "contents", &[("module_id", module_id)]).await?
            }
        };

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), module_id, item_kind, item_id, order)
                    .await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().unwrap(), module_id, item_kind, item_id, order)
                    .await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list_by_module(&self, module_id: i64) -> Result<Vec<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_module_sqlite(self.pool.as_sqlite().unwrap(), module_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_module_mysql(self.pool.as_mysql().unwrap(), module_id).await
            }
        }
    }

    async fn update_order(&self, id: i64, order: i32) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_order_sqlite(self.pool.as_sqlite().unwrap(), id, order).await
            }
            DatabaseDriver::Mysql => {
                update_order_mysql(self.pool.as_mysql().unwrap(), id, order).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

const SELECT_COLUMNS: &str = "id, module_id, item_kind, item_id, `order`, created_at, updated_at";

// SQLite implementations

async fn create_sqlite(
    pool: &SqlitePool,
    module_id: i64,
    item_kind: ItemKind,
    item_id: i64,
    order: i32,
) -> Result<Content> {
    let result = sqlx::query(
        "INSERT INTO contents (module_id, item_kind, item_id, `order`) VALUES (?, ?, ?, ?)",
    )
    .bind(module_id)
    .bind(item_kind.to_string())
    .bind(item_id)
    .bind(order)
    .execute(pool)
    .await
    .context("Failed to create content")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content not found after insert"))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("SELECT {} FROM contents WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content")?;
    row.map(|r| row_to_content_sqlite(&r)).transpose()
}

async fn list_by_module_sqlite(pool: &SqlitePool, module_id: i64) -> Result<Vec<Content>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM contents WHERE module_id = ? ORDER BY `order`, id",
        SELECT_COLUMNS
    ))
    .bind(module_id)
    .fetch_all(pool)
    .await
    .context("Failed to list contents")?;
    rows.iter().map(row_to_content_sqlite).collect()
}

async fn update_order_sqlite(pool: &SqlitePool, id: i64, order: i32) -> Result<()> {
    sqlx::query("UPDATE contents SET `order` = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(order)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update content order")?;
    Ok(())
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM contents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete content")?;
    Ok(())
}

fn row_to_content_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Content> {
    let kind: String = row.get("item_kind");
    Ok(Content {
        id: row.get("id"),
        module_id: row.get("module_id"),
        // The CHECK constraint guarantees one of the four literals
        item_kind: kind.parse()?,
        item_id: row.get("item_id"),
        order: row.get("order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// MySQL implementations

async fn create_mysql(
    pool: &MySqlPool,
    module_id: i64,
    item_kind: ItemKind,
    item_id: i64,
    order: i32,
) -> Result<Content> {
    let result = sqlx::query(
        "INSERT INTO contents (module_id, item_kind, item_id, `order`) VALUES (?, ?, ?, ?)",
    )
    .bind(module_id)
    .bind(item_kind.to_string())
    .bind(item_id)
    .bind(order)
    .execute(pool)
    .await
    .context("Failed to create content")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content not found after insert"))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("SELECT {} FROM contents WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content")?;
    row.map(|r| row_to_content_mysql(&r)).transpose()
}

async fn list_by_module_mysql(pool: &MySqlPool, module_id: i64) -> Result<Vec<Content>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM contents WHERE module_id = ? ORDER BY `order`, id",
        SELECT_COLUMNS
    ))
    .bind(module_id)
    .fetch_all(pool)
    .await
    .context("Failed to list contents")?;
    rows.iter().map(row_to_content_mysql).collect()
}

async fn update_order_mysql(pool: &MySqlPool, id: i64, order: i32) -> Result<()> {
    sqlx::query("UPDATE contents SET `order` = ? WHERE id = ?")
        .bind(order)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update content order")?;
    Ok(())
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM contents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete content")?;
    Ok(())
}

fn row_to_content_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Content> {
    let kind: String = row.get("item_kind");
    Ok(Content {
        id: row.get("id"),
        module_id: row.get("module_id"),
        item_kind: kind.parse()?,
        item_id: row.get("item_id"),
        order: row.get("order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CourseRepository, ModuleRepository, SqlxCourseRepository, SqlxModuleRepository,
        SqlxSubjectRepository, SqlxUserRepository, SubjectRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateModuleInput;

    struct Fixture {
        pool: DynDatabasePool,
        contents: SqlxContentRepository,
        module_id: i64,
        course_id: i64,
    }

    impl Fixture {
        async fn another_module(&self, title: &str) -> i64 {
            SqlxModuleRepository::new(self.pool.clone())
                .create(
                    self.course_id,
                    &CreateModuleInput {
                        title: title.to_string(),
                        description: None,
                        order: None,
                    },
                )
                .await
                .expect("module")
                .id
        }
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("test pool");
        migrations::run_migrations(&pool).await.expect("migrations");

        let owner = SqlxUserRepository::new(pool.clone())
            .create("amy", "amy@example.com")
            .await
            .expect("owner");
        let subject = SqlxSubjectRepository::new(pool.clone())
            .create("Programming", "programming")
            .await
            .expect("subject");
        let course = SqlxCourseRepository::new(pool.clone())
            .create(owner.id, subject.id, "Rust 101", "rust-101", "")
            .await
            .expect("course");
        let module = SqlxModuleRepository::new(pool.clone())
            .create(
                course.id,
                &CreateModuleInput {
                    title: "Intro".to_string(),
                    description: None,
                    order: None,
                },
            )
            .await
            .expect("module");

        Fixture {
            contents: SqlxContentRepository::new(pool.clone()),
            pool,
            module_id: module.id,
            course_id: course.id,
        }
    }

    #[tokio::test]
    async fn test_sequential_orders_per_module() {
        let f = setup().await;

        let c1 = f.contents.create(f.module_id, ItemKind::Text, 1, None).await.expect("create");
        let c2 = f.contents.create(f.module_id, ItemKind::Video, 1, None).await.expect("create");

        assert_eq!(c1.order, 0);
        assert_eq!(c2.order, 1);
        assert_eq!(c1.item_kind, ItemKind::Text);
        assert_eq!(c2.item_kind, ItemKind::Video);

        // A different module starts its own sequence
        let other = f.another_module("Basics").await;
        let c3 = f.contents.create(other, ItemKind::File, 1, None).await.expect("create");
        assert_eq!(c3.order, 0);
    }

    #[tokio::test]
    async fn test_explicit_order_is_kept() {
        let f = setup().await;

        let content = f
            .contents
            .create(f.module_id, ItemKind::Image, 9, Some(42))
            .await
            .expect("create");
        assert_eq!(content.order, 42);
    }

    #[tokio::test]
    async fn test_list_follows_order_sequence() {
        let f = setup().await;
        f.contents.create(f.module_id, ItemKind::Text, 1, Some(3)).await.expect("create");
        f.contents.create(f.module_id, ItemKind::Video, 2, Some(1)).await.expect("create");

        let contents = f.contents.list_by_module(f.module_id).await.expect("list");
        let orders: Vec<i32> = contents.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_order_and_delete() {
        let f = setup().await;
        let content = f.contents.create(f.module_id, ItemKind::Text, 1, None).await.expect("create");

        f.contents.update_order(content.id, 5).await.expect("reorder");
        let reloaded = f.contents.get_by_id(content.id).await.expect("get").expect("some");
        assert_eq!(reloaded.order, 5);

        f.contents.delete(content.id).await.expect("delete");
        assert!(f.contents.get_by_id(content.id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_module_delete_cascades_to_contents() {
        let f = setup().await;
        let content = f.contents.create(f.module_id, ItemKind::Text, 1, None).await.expect("create");

        SqlxModuleRepository::new(f.pool.clone())
            .delete(f.module_id)
            .await
            .expect("delete module");

        assert!(f.contents.get_by_id(content.id).await.expect("get").is_none());
    }
}
