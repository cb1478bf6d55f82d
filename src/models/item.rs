//! Content item models
//!
//! A content row references exactly one item of one of four kinds. The four
//! item tables share the same metadata columns, modeled here as an
//! `ItemMeta` value composed into each concrete item type. A resolved
//! reference is a `ContentItem`, a tagged union over the four kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported content item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Raw text
    Text,
    /// Uploaded file (path under the files directory)
    File,
    /// Uploaded image (path under the images directory)
    Image,
    /// External video URL
    Video,
}

impl ItemKind {
    /// Database table holding items of this kind
    pub fn table(&self) -> &'static str {
        match self {
            Self::Text => "text_items",
            Self::File => "file_items",
            Self::Image => "image_items",
            Self::Video => "video_items",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::File => write!(f, "file"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "file" => Ok(Self::File),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(anyhow::anyhow!("Unsupported item kind: {}", s)),
        }
    }
}

/// Metadata shared by all item kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemMeta {
    /// Unique identifier within the kind's table
    pub id: i64,
    /// Owning user ID
    pub owner_id: i64,
    /// Item title
    pub title: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Raw text item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextItem {
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Raw text payload
    pub content: String,
}

/// File item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileItem {
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Stored path under the files upload directory
    pub file: String,
}

/// Image item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageItem {
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Stored path under the images upload directory
    pub file: String,
}

/// Video item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoItem {
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// External video URL
    pub url: String,
}

/// A resolved polymorphic item reference.
///
/// The `(kind, id)` pair stored on a content row resolves to exactly one of
/// these variants by querying the matching table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Text(TextItem),
    File(FileItem),
    Image(ImageItem),
    Video(VideoItem),
}

impl ContentItem {
    /// The kind discriminator of this item
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Text(_) => ItemKind::Text,
            Self::File(_) => ItemKind::File,
            Self::Image(_) => ItemKind::Image,
            Self::Video(_) => ItemKind::Video,
        }
    }

    /// Shared metadata of the underlying item
    pub fn meta(&self) -> &ItemMeta {
        match self {
            Self::Text(item) => &item.meta,
            Self::File(item) => &item.meta,
            Self::Image(item) => &item.meta,
            Self::Video(item) => &item.meta,
        }
    }
}

/// Input for creating an item of any kind.
///
/// Exactly one payload field must be set, matching the target kind:
/// `content` for text, `file` for file/image, `url` for video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemInput {
    /// Owning user ID
    pub owner_id: i64,
    /// Item title
    pub title: String,
    /// Raw text payload (text items)
    #[serde(default)]
    pub content: Option<String>,
    /// Stored file path (file and image items)
    #[serde(default)]
    pub file: Option<String>,
    /// External URL (video items)
    #[serde(default)]
    pub url: Option<String>,
}
