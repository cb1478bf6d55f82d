//! Item service
//!
//! Business logic for the four item kinds. The main job here is payload
//! validation: each kind requires exactly one payload field (`content` for
//! text, `file` for file and image, `url` for video), and video URLs must be
//! http(s).

use crate::db::repositories::ItemRepository;
use crate::models::{ContentItem, CreateItemInput, ItemKind};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

/// Item service errors
#[derive(Debug, Error)]
pub enum ItemServiceError {
    #[error("{0} item requires the '{1}' field")]
    MissingPayload(ItemKind, &'static str),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0} item not found: {1}")]
    NotFound(ItemKind, i64),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    /// Create an item of the given kind after validating its payload
    pub async fn create(
        &self,
        kind: ItemKind,
        input: CreateItemInput,
    ) -> Result<ContentItem, ItemServiceError> {
        if input.title.trim().is_empty() {
            return Err(ItemServiceError::ValidationError(
                "Item title cannot be empty".to_string(),
            ));
        }
        let payload = extract_payload(kind, &input)?;

        Ok(self
            .repo
            .create(kind, input.owner_id, &input.title, payload)
            .await?)
    }

    pub async fn get(&self, kind: ItemKind, id: i64) -> Result<ContentItem, ItemServiceError> {
        self.repo
            .get(kind, id)
            .await?
            .ok_or(ItemServiceError::NotFound(kind, id))
    }

    pub async fn list_by_owner(
        &self,
        kind: ItemKind,
        owner_id: i64,
    ) -> Result<Vec<ContentItem>, ItemServiceError> {
        Ok(self.repo.list_by_owner(kind, owner_id).await?)
    }

    pub async fn delete(&self, kind: ItemKind, id: i64) -> Result<(), ItemServiceError> {
        if self.repo.get(kind, id).await?.is_none() {
            return Err(ItemServiceError::NotFound(kind, id));
        }
        Ok(self.repo.delete(kind, id).await?)
    }
}

/// Pick the payload field matching the kind, validating it along the way
fn extract_payload(kind: ItemKind, input: &CreateItemInput) -> Result<&str, ItemServiceError> {
    match kind {
        ItemKind::Text => input
            .content
            .as_deref()
            .ok_or(ItemServiceError::MissingPayload(kind, "content")),
        ItemKind::File | ItemKind::Image => match input.file.as_deref() {
            Some(file) if !file.is_empty() => Ok(file),
            _ => Err(ItemServiceError::MissingPayload(kind, "file")),
        },
        ItemKind::Video => {
            let url = input
                .url
                .as_deref()
                .ok_or(ItemServiceError::MissingPayload(kind, "url"))?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ItemServiceError::ValidationError(format!(
                    "Video URL must be http(s): {}",
                    url
                )));
            }
            Ok(url)
        }
    }
}
