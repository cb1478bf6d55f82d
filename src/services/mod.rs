//! Services layer - Business logic
//!
//! This module contains the business logic services for the coursecat
//! service. Services are responsible for:
//! - Implementing business rules (slug generation, uniqueness, references)
//! - Coordinating between repositories
//! - Handling validation and error cases

pub mod content;
pub mod course;
pub mod item;
pub mod module;
pub mod subject;

pub use content::ContentService;
pub use course::{CourseService, CourseServiceError};
pub use item::{ItemService, ItemServiceError};
pub use module::ModuleService;
pub use subject::{generate_slug, SubjectService, SubjectServiceError};
