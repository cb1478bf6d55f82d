//! Module model
//!
//! Modules are the ordered sections of a course. The `order` value is
//! assigned automatically on creation when not provided: the next value in
//! the per-course sequence (0 for the first module).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    /// Unique identifier
    pub id: i64,
    /// Parent course ID
    pub course_id: i64,
    /// Module title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Position within the course
    pub order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a module
#[derive(Debug, Clone, Deserialize)]
pub struct CreateModuleInput {
    /// Module title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit position; auto-computed per-course when omitted
    #[serde(default)]
    pub order: Option<i32>,
}

/// Input for updating a module
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateModuleInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New description (optional; `Some(None)` clears it)
    pub description: Option<Option<String>>,
    /// New position (optional)
    pub order: Option<i32>,
}

/// Input for batch reordering modules
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateModuleOrderInput {
    pub items: Vec<ModuleOrderItem>,
}

/// One entry in a batch module reorder
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleOrderItem {
    pub id: i64,
    pub order: i32,
}
