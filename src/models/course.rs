//! Course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Module;

/// Course entity.
///
/// A course belongs to a subject and is owned by a user. Course listings
/// are newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub owner_id: i64,
    /// Parent subject ID
    pub subject_id: i64,
    /// Course title
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Course overview text
    pub overview: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Course together with its modules in `order` sequence
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithModules {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<Module>,
}

/// Input for creating a course
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseInput {
    /// Owning user ID
    pub owner_id: i64,
    /// Parent subject ID
    pub subject_id: i64,
    /// Course title
    pub title: String,
    /// URL-friendly slug; generated from the title when omitted
    pub slug: Option<String>,
    /// Course overview text
    pub overview: String,
}

/// Input for updating a course
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseInput {
    /// New subject (optional)
    pub subject_id: Option<i64>,
    /// New title (optional)
    pub title: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
    /// New overview (optional)
    pub overview: Option<String>,
}
