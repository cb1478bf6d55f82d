//! Course repository
//!
//! Database operations for courses. Listings are newest-first, matching the
//! catalog's course list view.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Course;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Course repository trait
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Create a new course
    async fn create(
        &self,
        owner_id: i64,
        subject_id: i64,
        title: &str,
        slug: &str,
        overview: &str,
    ) -> Result<Course>;

    /// Get course by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Course>>;

    /// Get course by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Course>>;

    /// Check whether a slug is already taken
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// List all courses, newest-created-first
    async fn list(&self) -> Result<Vec<Course>>;

    /// List courses in one subject, newest-created-first
    async fn list_by_subject(&self, subject_id: i64) -> Result<Vec<Course>>;

    /// Update a course
    async fn update(&self, course: &Course) -> Result<Course>;

    /// Delete a course (cascades to its modules and contents)
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based course repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCourseRepository {
    pool: DynDatabasePool,
}

impl SqlxCourseRepository {
    /// Create a new SQLx course repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CourseRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CourseRepository for SqlxCourseRepository {
    async fn create(
        &self,
        owner_id: i64,
        subject_id: i64,
        title: &str,
        slug: &str,
        overview: &str,
    ) -> Result<Course> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(
                    self.pool.as_sqlite().unwrap(),
                    owner_id,
                    subject_id,
                    title,
                    slug,
                    overview,
                )
                .await
            }
            DatabaseDriver::Mysql => {
                create_mysql(
                    self.pool.as_mysql().unwrap(),
                    owner_id,
                    subject_id,
                    title,
                    slug,
                    overview,
                )
                .await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Course>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Course>> {
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

    async fn list(&self) -> Result<Vec<Course>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn list_by_subject(&self, subject_id: i64) -> Result<Vec<Course>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_subject_sqlite(self.pool.as_sqlite().unwrap(), subject_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_subject_mysql(self.pool.as_mysql().unwrap(), subject_id).await
            }
        }
    }

    async fn update(&self, course: &Course) -> Result<Course> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), course).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), course).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

const SELECT_COLUMNS: &str = "id, owner_id, subject_id, title, slug, overview, created_at, updated_at";

// CURRENT_TIMESTAMP has one-second resolution, so id breaks ties for
// rows created within the same second.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

// SQLite implementations

async fn create_sqlite(
    pool: &SqlitePool,
    owner_id: i64,
    subject_id: i64,
    title: &str,
    slug: &str,
    overview: &str,
) -> Result<Course> {
    let result = sqlx::query(
        "INSERT INTO courses (owner_id, subject_id, title, slug, overview) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(subject_id)
    .bind(title)
    .bind(slug)
    .bind(overview)
    .execute(pool)
    .await
    .context("Failed to create course")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course not found after insert"))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Course>> {
    let row = sqlx::query(&format!("SELECT {} FROM courses WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get course")?;
    Ok(row.map(|r| row_to_course_sqlite(&r)))
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Course>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM courses WHERE slug = ?",
        SELECT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get course by slug")?;
    Ok(row.map(|r| row_to_course_sqlite(&r)))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Course>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM courses {}",
        SELECT_COLUMNS, NEWEST_FIRST
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list courses")?;
    Ok(rows.iter().map(row_to_course_sqlite).collect())
}

async fn list_by_subject_sqlite(pool: &SqlitePool, subject_id: i64) -> Result<Vec<Course>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM courses WHERE subject_id = ? {}",
        SELECT_COLUMNS, NEWEST_FIRST
    ))
    .bind(subject_id)
    .fetch_all(pool)
    .await
    .context("Failed to list courses by subject")?;
    Ok(rows.iter().map(row_to_course_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, course: &Course) -> Result<Course> {
    sqlx::query(
        "UPDATE courses SET subject_id = ?, title = ?, slug = ?, overview = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(course.subject_id)
    .bind(&course.title)
    .bind(&course.slug)
    .bind(&course.overview)
    .bind(course.id)
    .execute(pool)
    .await
    .context("Failed to update course")?;

    get_by_id_sqlite(pool, course.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete course")?;
    Ok(())
}

fn row_to_course_sqlite(row: &sqlx::sqlite::SqliteRow) -> Course {
    Course {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        subject_id: row.get("subject_id"),
        title: row.get("title"),
        slug: row.get("slug"),
        overview: row.get("overview"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// MySQL implementations

async fn create_mysql(
    pool: &MySqlPool,
    owner_id: i64,
    subject_id: i64,
    title: &str,
    slug: &str,
    overview: &str,
) -> Result<Course> {
    let result = sqlx::query(
        "INSERT INTO courses (owner_id, subject_id, title, slug, overview) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(subject_id)
    .bind(title)
    .bind(slug)
    .bind(overview)
    .execute(pool)
    .await
    .context("Failed to create course")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course not found after insert"))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Course>> {
    let row = sqlx::query(&format!("SELECT {} FROM courses WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get course")?;
    Ok(row.map(|r| row_to_course_mysql(&r)))
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Course>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM courses WHERE slug = ?",
        SELECT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get course by slug")?;
    Ok(row.map(|r| row_to_course_mysql(&r)))
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Course>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM courses {}",
        SELECT_COLUMNS, NEWEST_FIRST
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list courses")?;
    Ok(rows.iter().map(row_to_course_mysql).collect())
}

async fn list_by_subject_mysql(pool: &MySqlPool, subject_id: i64) -> Result<Vec<Course>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM courses WHERE subject_id = ? {}",
        SELECT_COLUMNS, NEWEST_FIRST
    ))
    .bind(subject_id)
    .fetch_all(pool)
    .await
    .context("Failed to list courses by subject")?;
    Ok(rows.iter().map(row_to_course_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, course: &Course) -> Result<Course> {
    sqlx::query(
        "UPDATE courses SET subject_id = ?, title = ?, slug = ?, overview = ? WHERE id = ?",
    )
    .bind(course.subject_id)
    .bind(&course.title)
    .bind(&course.slug)
    .bind(&course.overview)
    .bind(course.id)
    .execute(pool)
    .await
    .context("Failed to update course")?;

    get_by_id_mysql(pool, course.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete course")?;
    Ok(())
}

fn row_to_course_mysql(row: &sqlx::mysql::MySqlRow) -> Course {
    Course {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        subject_id: row.get("subject_id"),
        title: row.get("title"),
        slug: row.get("slug"),
        overview: row.get("overview"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSubjectRepository, SqlxUserRepository, SubjectRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};

    struct Fixture {
        courses: SqlxCourseRepository,
        owner_id: i64,
        subject_id: i64,
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

        Fixture {
            courses: SqlxCourseRepository::new(pool),
            owner_id: owner.id,
            subject_id: subject.id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let f = setup().await;

        let course = f
            .courses
            .create(f.owner_id, f.subject_id, "Rust 101", "rust-101", "Intro to Rust")
            .await
            .expect("create");
        assert!(course.id > 0);
        assert_eq!(course.overview, "Intro to Rust");

        let by_slug = f.courses.get_by_slug("rust-101").await.expect("get");
        assert_eq!(by_slug, Some(course));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let f = setup().await;
        for (title, slug) in [("First", "first"), ("Second", "second"), ("Third", "third")] {
            f.courses
                .create(f.owner_id, f.subject_id, title, slug, "")
                .await
                .expect("create");
        }

        let courses = f.courses.list().await.expect("list");
        let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_list_by_subject_filters() {
        let f = setup().await;
        f.courses
            .create(f.owner_id, f.subject_id, "Rust 101", "rust-101", "")
            .await
            .expect("create");

        let courses = f.courses.list_by_subject(f.subject_id).await.expect("list");
        assert_eq!(courses.len(), 1);

        let none = f.courses.list_by_subject(f.subject_id + 1).await.expect("list");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update() {
        let f = setup().await;
        let mut course = f
            .courses
            .create(f.owner_id, f.subject_id, "Rust 101", "rust-101", "Old")
            .await
            .expect("create");

        course.overview = "New overview".to_string();
        let updated = f.courses.update(&course).await.expect("update");
        assert_eq!(updated.overview, "New overview");
    }

    #[tokio::test]
    async fn test_delete() {
        let f = setup().await;
        let course = f
            .courses
            .create(f.owner_id, f.subject_id, "Rust 101", "rust-101", "")
            .await
            .expect("create");

        f.courses.delete(course.id).await.expect("delete");
        assert!(f.courses.get_by_id(course.id).await.expect("get").is_none());
    }
}
