//! Content model
//!
//! A content row attaches one item to a module. Only the `(item_kind,
//! item_id)` pair is stored; the referenced item lives in one of the four
//! item tables and is resolved by an explicit lookup keyed on that pair.
//! Like modules within a course, contents order themselves within a module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentItem, ItemKind};

/// Content entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Unique identifier
    pub id: i64,
    /// Parent module ID
    pub module_id: i64,
    /// Kind of the referenced item
    pub item_kind: ItemKind,
    /// ID of the referenced item within its kind's table
    pub item_id: i64,
    /// Position within the module
    pub order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Content together with its resolved item
#[derive(Debug, Clone, Serialize)]
pub struct ContentWithItem {
    #[serde(flatten)]
    pub content: Content,
    /// The resolved item, or None if the reference dangles
    pub item: Option<ContentItem>,
}

/// Input for creating a content row
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentInput {
    /// Kind of the referenced item ("text", "file", "image" or "video")
    pub item_kind: String,
    /// ID of the referenced item
    pub item_id: i64,
    /// Explicit position; auto-computed per-module when omitted
    #[serde(default)]
    pub order: Option<i32>,
}

/// Input for batch reordering contents
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContentOrderInput {
    pub items: Vec<ContentOrderItem>,
}

/// One entry in a batch content reorder
#[derive(Debug, Clone, Deserialize)]
pub struct ContentOrderItem {
    pub id: i64,
    pub order: i32,
}
