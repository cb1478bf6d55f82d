//! Module API endpoints
//!
//! Handles HTTP requests for module management:
//! - GET /api/v1/modules/:id - Get a module
//! - PUT /api/v1/modules/:id - Update a module
//! - DELETE /api/v1/modules/:id - Delete a module
//! - POST /api/v1/modules/order - Batch reorder modules
//! - GET /api/v1/modules/:id/contents - List a module's contents with items
//! - POST /api/v1/modules/:id/contents - Attach an item to a module
//!
//! Module creation lives under the courses router; everything addressed by
//! module ID lives here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::contents::ContentResponse;
use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::{
    CreateContentInput, ItemKind, Module, UpdateModuleInput, UpdateModuleOrderInput,
};

/// Response for a single module
#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub order: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Module> for ModuleResponse {
    fn from(module: Module) -> Self {
        Self {
            id: module.id,
            course_id: module.course_id,
            title: module.title,
            description: module.description,
            order: module.order,
            created_at: module.created_at.to_rfc3339(),
            updated_at: module.updated_at.to_rfc3339(),
        }
    }
}

/// Build the modules router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(reorder_modules))
        .route(
            "/{id}",
            get(get_module).put(update_module).delete(delete_module),
        )
        .route("/{id}/contents", get(list_contents).post(create_content))
}

/// GET /api/v1/modules/:id - Get a module
async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = resolve_module(&state, id).await?;
    Ok(Json(module.into()))
}

/// PUT /api/v1/modules/:id - Update a module
async fn update_module(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateModuleInput>,
) -> Result<Json<ModuleResponse>, ApiError> {
    resolve_module(&state, id).await?;
    let module = state
        .module_service
        .update(id, input)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(module.into()))
}

/// DELETE /api/v1/modules/:id - Delete a module (contents cascade)
async fn delete_module(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    resolve_module(&state, id).await?;
    state
        .module_service
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/modules/order - Batch reorder modules
///
/// Assigns the given order values verbatim; used by drag-and-drop UIs that
/// recompute the whole sequence client-side.
async fn reorder_modules(
    State(state): State<AppState>,
    Json(input): Json<UpdateModuleOrderInput>,
) -> Result<StatusCode, ApiError> {
    state
        .module_service
        .update_order(input.items)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/modules/:id/contents - List a module's contents with resolved items
async fn list_contents(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ContentResponse>>, ApiError> {
    resolve_module(&state, id).await?;
    let contents = state
        .content_service
        .list_with_items(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(contents.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/modules/:id/contents - Attach an item to a module
///
/// When the request omits `order`, the content is placed after the module's
/// current last content.
async fn create_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateContentInput>,
) -> Result<(StatusCode, Json<ContentResponse>), ApiError> {
    resolve_module(&state, id).await?;
    let kind: ItemKind = input
        .item_kind
        .parse()
        .map_err(|e: anyhow::Error| ApiError::validation_error(e.to_string()))?;

    let content = state
        .content_service
        .create(id, kind, input.item_id, input.order)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;

    let item = state.item_service.get(kind, content.item_id).await.ok();

    Ok((
        StatusCode::CREATED,
        Json(ContentResponse::from_parts(content, item)),
    ))
}

async fn resolve_module(state: &AppState, id: i64) -> Result<Module, ApiError> {
    state
        .module_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Module not found: {}", id)))
}
