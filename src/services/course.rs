//! Course service

use crate::db::repositories::{CourseRepository, ModuleRepository, SubjectRepository, UserRepository};
use crate::models::{Course, CourseWithModules, CreateCourseInput, UpdateCourseInput};
use anyhow::Context;
use std::sync::Arc;

use super::generate_slug;

/// Error types for course service operations
#[derive(Debug, thiserror::Error)]
pub enum CourseServiceError {
    /// Course slug already exists
    #[error("Course slug already exists: {0}")]
    DuplicateSlug(String),

    /// Course not found
    #[error("Course not found: {0}")]
    NotFound(String),

    /// Referenced subject does not exist
    #[error("Subject not found: {0}")]
    SubjectNotFound(i64),

    /// Referenced owner does not exist
    #[error("Owner not found: {0}")]
    OwnerNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Course service for managing catalog courses
pub struct CourseService {
    repo: Arc<dyn CourseRepository>,
    subjects: Arc<dyn SubjectRepository>,
    users: Arc<dyn UserRepository>,
    modules: Arc<dyn ModuleRepository>,
}

impl CourseService {
    /// Create a new course service
    pub fn new(
        repo: Arc<dyn CourseRepository>,
        subjects: Arc<dyn SubjectRepository>,
        users: Arc<dyn UserRepository>,
        modules: Arc<dyn ModuleRepository>,
    ) -> Self {
        Self {
            repo,
            subjects,
            users,
            modules,
        }
    }

    /// Create a new course.
    ///
    /// The owner and subject must exist; the slug is generated from the
    /// title when not provided and must be unique.
    pub async fn create(&self, input: CreateCourseInput) -> Result<Course, CourseServiceError> {
        if input.title.trim().is_empty() {
            return Err(CourseServiceError::ValidationError(
                "Course title cannot be empty".to_string(),
            ));
        }

        if self
            .users
            .get_by_id(input.owner_id)
            .await
            .context("Failed to get owner")?
            .is_none()
        {
            return Err(CourseServiceError::OwnerNotFound(input.owner_id));
        }

        if self
            .subjects
            .get_by_id(input.subject_id)
            .await
            .context("Failed to get subject")?
            .is_none()
        {
            return Err(CourseServiceError::SubjectNotFound(input.subject_id));
        }

        let slug = match input.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => generate_slug(&input.title),
        };

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(CourseServiceError::DuplicateSlug(slug));
        }

        let created = self
            .repo
            .create(input.owner_id, input.subject_id, &input.title, &slug, &input.overview)
            .await
            .context("Failed to create course")?;

        Ok(created)
    }

    /// Get course by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Course>, CourseServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Get course by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Course>, CourseServiceError> {
        Ok(self.repo.get_by_slug(slug).await?)
    }

    /// Get course by slug together with its modules in order
    pub async fn get_with_modules(
        &self,
        slug: &str,
    ) -> Result<Option<CourseWithModules>, CourseServiceError> {
        let Some(course) = self.repo.get_by_slug(slug).await? else {
            return Ok(None);
        };

        let modules = self
            .modules
            .list_by_course(course.id)
            .await
            .context("Failed to list course modules")?;

        Ok(Some(CourseWithModules { course, modules }))
    }

    /// List all courses, newest-first
    pub async fn list(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.repo.list().await?)
    }

    /// List courses in one subject, newest-first
    pub async fn list_by_subject(&self, subject_id: i64) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.repo.list_by_subject(subject_id).await?)
    }

    /// Update a course
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCourseInput,
    ) -> Result<Course, CourseServiceError> {
        let mut course = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CourseServiceError::NotFound(id.to_string()))?;

        if let Some(subject_id) = input.subject_id {
            if self
                .subjects
                .get_by_id(subject_id)
                .await
                .context("Failed to get subject")?
                .is_none()
            {
                return Err(CourseServiceError::SubjectNotFound(subject_id));
            }
            course.subject_id = subject_id;
        }
        if let Some(title) = input.title {
            course.title = title;
        }
        if let Some(slug) = input.slug {
            if slug != course.slug {
                if self
                    .repo
                    .exists_by_slug(&slug)
                    .await
                    .context("Failed to check slug uniqueness")?
                {
                    return Err(CourseServiceError::DuplicateSlug(slug));
                }
                course.slug = slug;
            }
        }
        if let Some(overview) = input.overview {
            course.overview = overview;
        }

        Ok(self.repo.update(&course).await?)
    }

    /// Delete a course and, via cascade, its modules and contents
    pub async fn delete(&self, id: i64) -> Result<(), CourseServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(CourseServiceError::NotFound(id.to_string()));
        }
        Ok(self.repo.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCourseRepository, SqlxModuleRepository, SqlxSubjectRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};

    struct Fixture {
        service: CourseService,
        owner_id: i64,
        subject_id: i64,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("test pool");
        migrations::run_migrations(&pool).await.expect("migrations");

        let users = SqlxUserRepository::boxed(pool.clone());
        let subjects = SqlxSubjectRepository::boxed(pool.clone());
        let owner = users.create("amy", "amy@example.com").await.expect("owner");
        let subject = subjects.create("Programming", "programming").await.expect("subject");

        let service = CourseService::new(
            SqlxCourseRepository::boxed(pool.clone()),
            subjects,
            users,
            SqlxModuleRepository::boxed(pool),
        );

        Fixture {
            service,
            owner_id: owner.id,
            subject_id: subject.id,
        }
    }

    fn input(f: &Fixture, title: &str) -> CreateCourseInput {
        CreateCourseInput {
            owner_id: f.owner_id,
            subject_id: f.subject_id,
            title: title.to_string(),
            slug: None,
            overview: "Overview".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let f = setup().await;
        let course = f.service.create(input(&f, "Rust for Beginners")).await.expect("create");
        assert_eq!(course.slug, "rust-for-beginners");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_subject() {
        let f = setup().await;
        let mut bad = input(&f, "Rust");
        bad.subject_id = 999;

        let result = f.service.create(bad).await;
        assert!(matches!(result, Err(CourseServiceError::SubjectNotFound(999))));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_owner() {
        let f = setup().await;
        let mut bad = input(&f, "Rust");
        bad.owner_id = 999;

        let result = f.service.create(bad).await;
        assert!(matches!(result, Err(CourseServiceError::OwnerNotFound(999))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let f = setup().await;
        f.service.create(input(&f, "Rust")).await.expect("create");

        let result = f.service.create(input(&f, "Rust")).await;
        assert!(matches!(result, Err(CourseServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_get_with_modules_orders_modules() {
        let f = setup().await;
        let course = f.service.create(input(&f, "Rust")).await.expect("create");

        let with_modules = f
            .service
            .get_with_modules("rust")
            .await
            .expect("get")
            .expect("some");
        assert!(with_modules.modules.is_empty());
        assert_eq!(with_modules.course.id, course.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let f = setup().await;
        let course = f.service.create(input(&f, "Rust")).await.expect("create");

        let updated = f
            .service
            .update(
                course.id,
                UpdateCourseInput {
                    overview: Some("New".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.overview, "New");

        f.service.delete(course.id).await.expect("delete");
        let result = f.service.delete(course.id).await;
        assert!(matches!(result, Err(CourseServiceError::NotFound(_))));
    }
}
