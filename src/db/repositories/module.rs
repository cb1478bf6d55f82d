//! Module repository
//!
//! Database operations for course modules. On create, a missing `order`
//! is filled with the next value in the per-course sequence (see
//! `db::ordering`); an explicit `order` is stored untouched.

use crate::config::DatabaseDriver;
use crate::db::{ordering, DynDatabasePool};
use crate::models::{CreateModuleInput, Module};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Module repository trait
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Create a module under a course, auto-assigning `order` when unset
    async fn create(&self, course_id: i64, input: &CreateModuleInput) -> Result<Module>;

    /// Get module by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Module>>;

    /// List a course's modules in `order` sequence
    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>>;

    /// Update a module's title, description and order
    async fn update(&self, module: &Module) -> Result<Module>;

    /// Set a module's order explicitly (caller reassignment)
    async fn update_order(&self, id: i64, order: i32) -> Result<()>;

    /// Delete a module (cascades to its contents)
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based module repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxModuleRepository {
    pool: DynDatabasePool,
}

impl SqlxModuleRepository {
    /// Create a new SQLx module repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ModuleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ModuleRepository for SqlxModuleRepository {
    async fn create(&self, course_id: i64, input: &CreateModuleInput) -> Result<Module> {
        // One sibling read, only when the caller left the order unset
        let order = match input.order {
            Some(order) => order,
            None => ordering::next_order(&self.pool, "modules", &[("course_id", course_id)]).await?,
        };

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), course_id, input, order).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().unwrap(), course_id, input, order).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Module>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_course_sqlite(self.pool.as_sqlite().unwrap(), course_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_course_mysql(self.pool.as_mysql().unwrap(), course_id).await
            }
        }
    }

    async fn update(&self, module: &Module) -> Result<Module> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), module).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), module).await,
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

const SELECT_COLUMNS: &str = "id, course_id, title, description, `order`, created_at, updated_at";

// SQLite implementations

async fn create_sqlite(
    pool: &SqlitePool,
    course_id: i64,
    input: &CreateModuleInput,
    order: i32,
) -> Result<Module> {
    let result = sqlx::query(
        "INSERT INTO modules (course_id, title, description, `order`) VALUES (?, ?, ?, ?)",
    )
    .bind(course_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(order)
    .execute(pool)
    .await
    .context("Failed to create module")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Module not found after insert"))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Module>> {
    let row = sqlx::query(&format!("SELECT {} FROM modules WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get module")?;
    Ok(row.map(|r| row_to_module_sqlite(&r)))
}

async fn list_by_course_sqlite(pool: &SqlitePool, course_id: i64) -> Result<Vec<Module>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM modules WHERE course_id = ? ORDER BY `order`, id",
        SELECT_COLUMNS
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
    .context("Failed to list modules")?;
    Ok(rows.iter().map(row_to_module_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, module: &Module) -> Result<Module> {
    sqlx::query(
        "UPDATE modules SET title = ?, description = ?, `order` = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&module.title)
    .bind(&module.description)
    .bind(module.order)
    .bind(module.id)
    .execute(pool)
    .await
    .context("Failed to update module")?;

    get_by_id_sqlite(pool, module.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Module not found after update"))
}

async fn update_order_sqlite(pool: &SqlitePool, id: i64, order: i32) -> Result<()> {
    sqlx::query("UPDATE modules SET `order` = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(order)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update module order")?;
    Ok(())
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM modules WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete module")?;
    Ok(())
}

fn row_to_module_sqlite(row: &sqlx::sqlite::SqliteRow) -> Module {
    Module {
        id: row.get("id"),
        course_id: row.get("course_id"),
        title: row.get("title"),
        description: row.get("description"),
        order: row.get("order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// MySQL implementations

async fn create_mysql(
    pool: &MySqlPool,
    course_id: i64,
    input: &CreateModuleInput,
    order: i32,
) -> Result<Module> {
    let result = sqlx::query(
        "INSERT INTO modules (course_id, title, description, `order`) VALUES (?, ?, ?, ?)",
    )
    .bind(course_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(order)
    .execute(pool)
    .await
    .context("Failed to create module")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Module not found after insert"))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Module>> {
    let row = sqlx::query(&format!("SELECT {} FROM modules WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get module")?;
    Ok(row.map(|r| row_to_module_mysql(&r)))
}

async fn list_by_course_mysql(pool: &MySqlPool, course_id: i64) -> Result<Vec<Module>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM modules WHERE course_id = ? ORDER BY `order`, id",
        SELECT_COLUMNS
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
    .context("Failed to list modules")?;
    Ok(rows.iter().map(row_to_module_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, module: &Module) -> Result<Module> {
    sqlx::query("UPDATE modules SET title = ?, description = ?, `order` = ? WHERE id = ?")
        .bind(&module.title)
        .bind(&module.description)
        .bind(module.order)
        .bind(module.id)
        .execute(pool)
        .await
        .context("Failed to update module")?;

    get_by_id_mysql(pool, module.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Module not found after update"))
}

async fn update_order_mysql(pool: &MySqlPool, id: i64, order: i32) -> Result<()> {
    sqlx::query("UPDATE modules SET `order` = ? WHERE id = ?")
        .bind(order)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update module order")?;
    Ok(())
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM modules WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete module")?;
    Ok(())
}

fn row_to_module_mysql(row: &sqlx::mysql::MySqlRow) -> Module {
    Module {
        id: row.get("id"),
        course_id: row.get("course_id"),
        title: row.get("title"),
        description: row.get("description"),
        order: row.get("order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
