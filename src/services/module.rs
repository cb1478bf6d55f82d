//! Module service

use crate::db::repositories::ModuleRepository;
use crate::models::{CreateModuleInput, Module, ModuleOrderItem, UpdateModuleInput};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Module service; thin layer over the repository. Order assignment itself
/// happens in the data layer at create time.
pub struct ModuleService {
    repo: Arc<dyn ModuleRepository>,
}

impl ModuleService {
    pub fn new(repo: Arc<dyn ModuleRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, course_id: i64, input: CreateModuleInput) -> Result<Module> {
        if input.title.trim().is_empty() {
            anyhow::bail!("Module title cannot be empty");
        }
        self.repo
            .create(course_id, &input)
            .await
            .context("Failed to create module")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Module>> {
        self.repo.get_by_id(id).await
    }

    pub async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        self.repo.list_by_course(course_id).await
    }

    pub async fn update(&self, id: i64, input: UpdateModuleInput) -> Result<Module> {
        let mut module = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Module not found: {}", id))?;

        if let Some(title) = input.title {
            module.title = title;
        }
        if let Some(description) = input.description {
            module.description = description;
        }
        if let Some(order) = input.order {
            module.order = order;
        }

        self.repo.update(&module).await
    }

    /// Reassign orders in bulk (drag-and-drop reordering)
    pub async fn update_order(&self, items: Vec<ModuleOrderItem>) -> Result<()> {
        for item in items {
            self.repo.update_order(item.id, item.order).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CourseRepository, SqlxCourseRepository, SqlxModuleRepository, SqlxSubjectRepository,
        SqlxUserRepository, SubjectRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (ModuleService, i64) {
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

        (
            ModuleService::new(SqlxModuleRepository::boxed(pool)),
            course.id,
        )
    }

    fn input(title: &str) -> CreateModuleInput {
        CreateModuleInput {
            title: title.to_string(),
            description: None,
            order: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let (service, course_id) = setup().await;
        let result = service.create(course_id, input("  ")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_batch_reorder() {
        let (service, course_id) = setup().await;
        let a = service.create(course_id, input("A")).await.expect("create");
        let b = service.create(course_id, input("B")).await.expect("create");

        service
            .update_order(vec![
                ModuleOrderItem { id: a.id, order: 1 },
                ModuleOrderItem { id: b.id, order: 0 },
            ])
            .await
            .expect("reorder");

        let modules = service.list_by_course(course_id).await.expect("list");
        let titles: Vec<&str> = modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let (service, course_id) = setup().await;
        let module = service
            .create(
                course_id,
                CreateModuleInput {
                    title: "A".to_string(),
                    description: Some("old".to_string()),
                    order: None,
                },
            )
            .await
            .expect("create");

        let updated = service
            .update(
                module.id,
                UpdateModuleInput {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert!(updated.description.is_none());
    }
}
