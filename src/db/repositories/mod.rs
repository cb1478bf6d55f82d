//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod content;
pub mod course;
pub mod item;
pub mod module;
pub mod subject;
pub mod user;

pub use content::{ContentRepository, SqlxContentRepository};
pub use course::{CourseRepository, SqlxCourseRepository};
pub use item::{ItemRepository, SqlxItemRepository};
pub use module::{ModuleRepository, SqlxModuleRepository};
pub use subject::{SqlxSubjectRepository, SubjectRepository};
pub use user::{SqlxUserRepository, UserRepository};
