//! API error responses
//!
//! All API errors share one JSON envelope: `{"error": {"code", "message",
//! "details"}}`. The code string maps to the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{CourseServiceError, ItemServiceError, SubjectServiceError};

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<SubjectServiceError> for ApiError {
    fn from(err: SubjectServiceError) -> Self {
        match err {
            SubjectServiceError::DuplicateSlug(_) => Self::conflict(err.to_string()),
            SubjectServiceError::NotFound(_) => Self::not_found(err.to_string()),
            SubjectServiceError::ValidationError(_) => Self::validation_error(err.to_string()),
            SubjectServiceError::InternalError(_) => Self::internal_error(err.to_string()),
        }
    }
}

impl From<CourseServiceError> for ApiError {
    fn from(err: CourseServiceError) -> Self {
        match err {
            CourseServiceError::DuplicateSlug(_) => Self::conflict(err.to_string()),
            CourseServiceError::NotFound(_)
            | CourseServiceError::SubjectNotFound(_)
            | CourseServiceError::OwnerNotFound(_) => Self::not_found(err.to_string()),
            CourseServiceError::ValidationError(_) => Self::validation_error(err.to_string()),
            CourseServiceError::InternalError(_) => Self::internal_error(err.to_string()),
        }
    }
}

impl From<ItemServiceError> for ApiError {
    fn from(err: ItemServiceError) -> Self {
        match err {
            ItemServiceError::MissingPayload(_, _) | ItemServiceError::ValidationError(_) => {
                Self::validation_error(err.to_string())
            }
            ItemServiceError::NotFound(_, _) => Self::not_found(err.to_string()),
            ItemServiceError::InternalError(_) => Self::internal_error(err.to_string()),
        }
    }
}
