//! Content service
//!
//! Ties content rows to the items they reference. Creation checks that the
//! referenced item actually exists; listing resolves each row's item, leaving
//! `None` where the reference dangles (the item was deleted independently).

use crate::db::repositories::{ContentRepository, ItemRepository};
use crate::models::{Content, ContentOrderItem, ContentWithItem, ItemKind};
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct ContentService {
    contents: Arc<dyn ContentRepository>,
    items: Arc<dyn ItemRepository>,
}

impl ContentService {
    pub fn new(contents: Arc<dyn ContentRepository>, items: Arc<dyn ItemRepository>) -> Self {
        Self { contents, items }
    }

    /// Attach an item to a module. The item must exist at attach time.
    pub async fn create(
        &self,
        module_id: i64,
        item_kind: ItemKind,
        item_id: i64,
        order: Option<i32>,
    ) -> Result<Content> {
        if self.items.get(item_kind, item_id).await?.is_none() {
            anyhow::bail!("{} item not found: {}", item_kind, item_id);
        }
        self.contents
            .create(module_id, item_kind, item_id, order)
            .await
            .context("Failed to create content")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Content>> {
        self.contents.get_by_id(id).await
    }

    /// List a module's contents with each referenced item resolved
    pub async fn list_with_items(&self, module_id: i64) -> Result<Vec<ContentWithItem>> {
        let contents = self.contents.list_by_module(module_id).await?;
        let mut result = Vec::with_capacity(contents.len());
        for content in contents {
            let item = self.items.get(content.item_kind, content.item_id).await?;
            result.push(ContentWithItem { content, item });
        }
        Ok(result)
    }

    /// Reassign orders in bulk (drag-and-drop reordering)
    pub async fn update_order(&self, items: Vec<ContentOrderItem>) -> Result<()> {
        for item in items {
            self.contents.update_order(item.id, item.order).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.contents.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CourseRepository, ModuleRepository, SqlxContentRepository, SqlxCourseRepository,
        SqlxItemRepository, SqlxModuleRepository, SqlxSubjectRepository, SqlxUserRepository,
        SubjectRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{ContentItem, CreateModuleInput};

    struct Fixture {
        service: ContentService,
        items: Arc<dyn ItemRepository>,
        module_id: i64,
        owner_id: i64,
    }

    async fn setup() -> Fixture {
        let pool: DynDatabasePool = create_test_pool().await.expect("test pool");
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
                    title: "Basics".to_string(),
                    description: None,
                    order: None,
                },
            )
            .await
            .expect("module");

        let items = SqlxItemRepository::boxed(pool.clone());
        Fixture {
            service: ContentService::new(SqlxContentRepository::boxed(pool), items.clone()),
            items,
            module_id: module.id,
            owner_id: owner.id,
        }
    }

    async fn text_item(f: &Fixture, title: &str) -> i64 {
        let item = f
            .items
            .create(ItemKind::Text, f.owner_id, title, "body")
            .await
            .expect("item");
        item.meta().id
    }

    #[tokio::test]
    async fn test_create_rejects_missing_item() {
        let f = setup().await;
        let result = f.service.create(f.module_id, ItemKind::Text, 999, None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_resolves_items() {
        let f = setup().await;
        let item_id = text_item(&f, "Intro").await;
        f.service
            .create(f.module_id, ItemKind::Text, item_id, None)
            .await
            .expect("create");

        let listed = f.service.list_with_items(f.module_id).await.expect("list");
        assert_eq!(listed.len(), 1);
        match listed[0].item.as_ref().expect("resolved item") {
            ContentItem::Text(text) => assert_eq!(text.meta.title, "Intro"),
            other => panic!("expected text item, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_keeps_dangling_reference_as_none() {
        let f = setup().await;
        let item_id = text_item(&f, "Intro").await;
        f.service
            .create(f.module_id, ItemKind::Text, item_id, None)
            .await
            .expect("create");
        f.items
            .delete(ItemKind::Text, item_id)
            .await
            .expect("delete item");

        let listed = f.service.list_with_items(f.module_id).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert!(listed[0].item.is_none());
    }

    #[tokio::test]
    async fn test_batch_reorder() {
        let f = setup().await;
        let first = text_item(&f, "First").await;
        let second = text_item(&f, "Second").await;
        let a = f
            .service
            .create(f.module_id, ItemKind::Text, first, None)
            .await
            .expect("create");
        let b = f
            .service
            .create(f.module_id, ItemKind::Text, second, None)
            .await
            .expect("create");

        f.service
            .update_order(vec![
                ContentOrderItem { id: a.id, order: 1 },
                ContentOrderItem { id: b.id, order: 0 },
            ])
            .await
            .expect("reorder");

        let listed = f.service.list_with_items(f.module_id).await.expect("list");
        assert_eq!(listed[0].content.id, b.id);
        assert_eq!(listed[1].content.id, a.id);
    }
}
