//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints for the course catalog:
//! - Subject API endpoints
//! - Course API endpoints (including module creation)
//! - Module API endpoints (including content creation and batch reorder)
//! - Content API endpoints
//! - Item API endpoints (text, file, image, video)
//! - The HTML course list page at /

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod contents;
pub mod courses;
pub mod error;
pub mod items;
pub mod modules;
pub mod subjects;

pub use error::ApiError;

use crate::services::{ContentService, CourseService, ItemService, ModuleService, SubjectService};
use crate::views::ViewEngine;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub subject_service: Arc<SubjectService>,
    pub course_service: Arc<CourseService>,
    pub module_service: Arc<ModuleService>,
    pub content_service: Arc<ContentService>,
    pub item_service: Arc<ItemService>,
    pub views: Arc<ViewEngine>,
}

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/subjects", subjects::router())
        .nest("/courses", courses::router())
        .nest("/modules", modules::router())
        .nest("/contents", contents::router())
        .nest("/items", items::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(crate::views::course_list_page))
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
