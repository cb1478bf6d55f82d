//! Subject model
//!
//! Subjects are the top level of the catalog; courses belong to exactly one
//! subject. Subjects list alphabetically by title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    /// Unique identifier
    pub id: i64,
    /// Subject title
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a subject
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectInput {
    /// Subject title
    pub title: String,
    /// URL-friendly slug; generated from the title when omitted
    pub slug: Option<String>,
}

/// Input for updating a subject
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubjectInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
}
