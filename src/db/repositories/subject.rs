//! Subject repository
//!
//! Database operations for subjects. Listings are alphabetical by title.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Subject;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Subject repository trait
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Create a new subject
    async fn create(&self, title: &str, slug: &str) -> Result<Subject>;

    /// Get subject by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Subject>>;

    /// Get subject by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Subject>>;

    /// Check whether a slug is already taken
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// List all subjects, alphabetically by title
    async fn list(&self) -> Result<Vec<Subject>>;

    /// Update a subject's title and slug
    async fn update(&self, subject: &Subject) -> Result<Subject>;

    /// Delete a subject (cascades to its courses)
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based subject repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxSubjectRepository {
    pool: DynDatabasePool,
}

impl SqlxSubjectRepository {
    /// Create a new SQLx subject repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SubjectRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SubjectRepository for SqlxSubjectRepository {
    async fn create(&self, title: &str, slug: &str) -> Result<Subject> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), title, slug).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().unwrap(), title, slug).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subject>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => get_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await,
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.get_by_slug(slug).await?.is_some())
    }

    async fn list(&self) -> Result<Vec<Subject>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, subject: &Subject) -> Result<Subject> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), subject).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), subject).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

const SELECT_COLUMNS: &str = "id, title, slug, created_at, updated_at";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, title: &str, slug: &str) -> Result<Subject> {
    let result = sqlx::query("INSERT INTO subjects (title, slug) VALUES (?, ?)")
        .bind(title)
        .bind(slug)
        .execute(pool)
        .await
        .context("Failed to create subject")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Subject not found after insert"))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Subject>> {
    let row = sqlx::query(&format!("SELECT {} FROM subjects WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get subject")?;
    Ok(row.map(|r| row_to_subject_sqlite(&r)))
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Subject>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM subjects WHERE slug = ?",
        SELECT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get subject by slug")?;
    Ok(row.map(|r| row_to_subject_sqlite(&r)))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Subject>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM subjects ORDER BY title, id",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list subjects")?;
    Ok(rows.iter().map(row_to_subject_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, subject: &Subject) -> Result<Subject> {
    sqlx::query("UPDATE subjects SET title = ?, slug = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(&subject.title)
        .bind(&subject.slug)
        .bind(subject.id)
        .execute(pool)
        .await
        .context("Failed to update subject")?;

    get_by_id_sqlite(pool, subject.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Subject not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete subject")?;
    Ok(())
}

fn row_to_subject_sqlite(row: &sqlx::sqlite::SqliteRow) -> Subject {
    Subject {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, title: &str, slug: &str) -> Result<Subject> {
    let result = sqlx::query("INSERT INTO subjects (title, slug) VALUES (?, ?)")
        .bind(title)
        .bind(slug)
        .execute(pool)
        .await
        .context("Failed to create subject")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Subject not found after insert"))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Subject>> {
    let row = sqlx::query(&format!("SELECT {} FROM subjects WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get subject")?;
    Ok(row.map(|r| row_to_subject_mysql(&r)))
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Subject>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM subjects WHERE slug = ?",
        SELECT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get subject by slug")?;
    Ok(row.map(|r| row_to_subject_mysql(&r)))
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Subject>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM subjects ORDER BY title, id",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list subjects")?;
    Ok(rows.iter().map(row_to_subject_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, subject: &Subject) -> Result<Subject> {
    sqlx::query("UPDATE subjects SET title = ?, slug = ? WHERE id = ?")
        .bind(&subject.title)
        .bind(&subject.slug)
        .bind(subject.id)
        .execute(pool)
        .await
        .context("Failed to update subject")?;

    get_by_id_mysql(pool, subject.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Subject not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete subject")?;
    Ok(())
}

fn row_to_subject_mysql(row: &sqlx::mysql::MySqlRow) -> Subject {
    Subject {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
