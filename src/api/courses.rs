//! Course API endpoints
//!
//! Handles HTTP requests for course management:
//! - GET /api/v1/courses - List courses, newest first (optional ?subject=slug)
//! - POST /api/v1/courses - Create a course
//! - GET /api/v1/courses/:slug - Get a course with its modules
//! - PUT /api/v1/courses/:slug - Update a course
//! - DELETE /api/v1/courses/:slug - Delete a course
//! - GET /api/v1/courses/:slug/modules - List a course's modules in order
//! - POST /api/v1/courses/:slug/modules - Add a module to a course

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::modules::ModuleResponse;
use crate::api::AppState;
use crate::models::{Course, CreateCourseInput, CreateModuleInput, UpdateCourseInput};

/// Query parameters for listing courses
#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    /// Restrict the listing to one subject, by slug
    pub subject: Option<String>,
}

/// Response for a single course
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub owner_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            owner_id: course.owner_id,
            subject_id: course.subject_id,
            title: course.title,
            slug: course.slug,
            overview: course.overview,
            created_at: course.created_at.to_rfc3339(),
            updated_at: course.updated_at.to_rfc3339(),
        }
    }
}

/// Response for course list
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
}

/// Response for a course with its modules
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub modules: Vec<ModuleResponse>,
}

/// Build the courses router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/{slug}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{slug}/modules", get(list_modules).post(create_module))
}

/// GET /api/v1/courses - List courses, newest first
///
/// `?subject=<slug>` restricts the listing to one subject.
async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let courses = match query.subject {
        Some(slug) => {
            let subject = state
                .subject_service
                .get_by_slug(&slug)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", slug)))?;
            state.course_service.list_by_subject(subject.id).await?
        }
        None => state.course_service.list().await?,
    };

    Ok(Json(CourseListResponse {
        courses: courses.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/courses - Create a course
async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let course = state.course_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// GET /api/v1/courses/:slug - Get a course with its modules in order
async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = state
        .course_service
        .get_with_modules(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Course not found: {}", slug)))?;

    Ok(Json(CourseDetailResponse {
        course: detail.course.into(),
        modules: detail.modules.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /api/v1/courses/:slug - Update a course
async fn update_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateCourseInput>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = resolve_course(&state, &slug).await?;
    let updated = state.course_service.update(course.id, input).await?;
    Ok(Json(updated.into()))
}

/// DELETE /api/v1/courses/:slug - Delete a course (modules cascade)
async fn delete_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let course = resolve_course(&state, &slug).await?;
    state.course_service.delete(course.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/courses/:slug/modules - List a course's modules in order
async fn list_modules(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let course = resolve_course(&state, &slug).await?;
    let modules = state
        .module_service
        .list_by_course(course.id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(modules.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/courses/:slug/modules - Add a module to a course
///
/// When the request omits `order`, the module is placed after the course's
/// current last module.
async fn create_module(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CreateModuleInput>,
) -> Result<(StatusCode, Json<ModuleResponse>), ApiError> {
    let course = resolve_course(&state, &slug).await?;
    let module = state
        .module_service
        .create(course.id, input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(module.into())))
}

async fn resolve_course(state: &AppState, slug: &str) -> Result<Course, ApiError> {
    state
        .course_service
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Course not found: {}", slug)))
}
