//! Item API endpoints
//!
//! Handles HTTP requests for the four item kinds. The kind is a path
//! segment ("text", "file", "image", "video"); unknown kinds are rejected
//! with a validation error before any lookup.
//!
//! - POST /api/v1/items/:kind - Create an item
//! - GET /api/v1/items/:kind/:id - Get an item
//! - DELETE /api/v1/items/:kind/:id - Delete an item
//! - GET /api/v1/items/:kind/owner/:owner_id - List an owner's items of a kind

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::{ContentItem, CreateItemInput, ItemKind};

/// Build the items router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}", post(create_item))
        .route("/{kind}/{id}", get(get_item).delete(delete_item))
        .route("/{kind}/owner/{owner_id}", get(list_owner_items))
}

fn parse_kind(kind: &str) -> Result<ItemKind, ApiError> {
    kind.parse()
        .map_err(|e: anyhow::Error| ApiError::validation_error(e.to_string()))
}

/// POST /api/v1/items/:kind - Create an item
async fn create_item(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<ContentItem>), ApiError> {
    let kind = parse_kind(&kind)?;
    let item = state.item_service.create(kind, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/items/:kind/:id - Get an item
async fn get_item(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<ContentItem>, ApiError> {
    let kind = parse_kind(&kind)?;
    let item = state.item_service.get(kind, id).await?;
    Ok(Json(item))
}

/// DELETE /api/v1/items/:kind/:id - Delete an item
///
/// Contents referencing the item are left in place; their reference dangles
/// and resolves to null until detached.
async fn delete_item(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    state.item_service.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/items/:kind/owner/:owner_id - List an owner's items of a kind
async fn list_owner_items(
    State(state): State<AppState>,
    Path((kind, owner_id)): Path<(String, i64)>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let items = state.item_service.list_by_owner(kind, owner_id).await?;
    Ok(Json(items))
}
