//! Content API endpoints
//!
//! Handles HTTP requests for module contents:
//! - DELETE /api/v1/contents/:id - Detach a content from its module
//! - POST /api/v1/contents/order - Batch reorder contents
//!
//! Content creation and listing live under the modules router.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::{Content, ContentItem, ContentWithItem, UpdateContentOrderInput};

/// Response for a content row with its resolved item
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: i64,
    pub module_id: i64,
    pub item_kind: String,
    pub item_id: i64,
    pub order: i32,
    /// The resolved item, or null if the reference dangles
    pub item: Option<ContentItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl ContentResponse {
    pub fn from_parts(content: Content, item: Option<ContentItem>) -> Self {
        Self {
            id: content.id,
            module_id: content.module_id,
            item_kind: content.item_kind.to_string(),
            item_id: content.item_id,
            order: content.order,
            item,
            created_at: content.created_at.to_rfc3339(),
            updated_at: content.updated_at.to_rfc3339(),
        }
    }
}

impl From<ContentWithItem> for ContentResponse {
    fn from(with_item: ContentWithItem) -> Self {
        Self::from_parts(with_item.content, with_item.item)
    }
}

/// Build the contents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(reorder_contents))
        .route("/{id}", delete(delete_content))
}

/// POST /api/v1/contents/order - Batch reorder contents
async fn reorder_contents(
    State(state): State<AppState>,
    Json(input): Json<UpdateContentOrderInput>,
) -> Result<StatusCode, ApiError> {
    state
        .content_service
        .update_order(input.items)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/contents/:id - Detach a content (the item itself survives)
async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let content = state
        .content_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Content not found: {}", id)))?;

    state
        .content_service
        .delete(content.id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}
