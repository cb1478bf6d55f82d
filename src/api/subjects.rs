//! Subject API endpoints
//!
//! Handles HTTP requests for subject management:
//! - GET /api/v1/subjects - List subjects alphabetically
//! - POST /api/v1/subjects - Create a subject
//! - GET /api/v1/subjects/:slug - Get a subject by slug
//! - GET /api/v1/subjects/:slug/courses - List a subject's courses
//! - PUT /api/v1/subjects/:slug - Update a subject
//! - DELETE /api/v1/subjects/:slug - Delete a subject

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::api::courses::CourseResponse;
use crate::models::{CreateSubjectInput, UpdateSubjectInput};

/// Response for a single subject
#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::models::Subject> for SubjectResponse {
    fn from(subject: crate::models::Subject) -> Self {
        Self {
            id: subject.id,
            title: subject.title,
            slug: subject.slug,
            created_at: subject.created_at.to_rfc3339(),
            updated_at: subject.updated_at.to_rfc3339(),
        }
    }
}

/// Response for subject list
#[derive(Debug, Serialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
}

/// Build the subjects router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects).post(create_subject))
        .route(
            "/{slug}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/{slug}/courses", get(list_subject_courses))
}

/// GET /api/v1/subjects - List subjects alphabetically
async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<SubjectListResponse>, ApiError> {
    let subjects = state.subject_service.list().await?;
    Ok(Json(SubjectListResponse {
        subjects: subjects.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/subjects - Create a subject
async fn create_subject(
    State(state): State<AppState>,
    Json(input): Json<CreateSubjectInput>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    let subject = state.subject_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

/// GET /api/v1/subjects/:slug - Get a subject by slug
async fn get_subject(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject = state
        .subject_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", slug)))?;

    Ok(Json(subject.into()))
}

/// GET /api/v1/subjects/:slug/courses - List a subject's courses, newest first
async fn list_subject_courses(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let subject = state
        .subject_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", slug)))?;

    let courses = state.course_service.list_by_subject(subject.id).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// PUT /api/v1/subjects/:slug - Update a subject
async fn update_subject(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateSubjectInput>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject = state
        .subject_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", slug)))?;

    let updated = state.subject_service.update(subject.id, input).await?;
    Ok(Json(updated.into()))
}

/// DELETE /api/v1/subjects/:slug - Delete a subject
async fn delete_subject(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let subject = state
        .subject_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Subject not found: {}", slug)))?;

    state.subject_service.delete(subject.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
