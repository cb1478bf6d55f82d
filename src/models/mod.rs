//! Data models
//!
//! This module contains all data structures used throughout the coursecat
//! service. Models represent:
//! - Database entities (User, Subject, Course, Module, Content, items)
//! - API request/response input types
//! - The tagged `ContentItem` union resolved from polymorphic references

mod content;
mod course;
mod item;
mod module;
mod subject;
mod user;

pub use content::{
    Content, ContentOrderItem, ContentWithItem, CreateContentInput, UpdateContentOrderInput,
};
pub use course::{Course, CourseWithModules, CreateCourseInput, UpdateCourseInput};
pub use item::{
    ContentItem, CreateItemInput, FileItem, ImageItem, ItemKind, ItemMeta, TextItem, VideoItem,
};
pub use module::{
    CreateModuleInput, Module, ModuleOrderItem, UpdateModuleInput, UpdateModuleOrderInput,
};
pub use subject::{CreateSubjectInput, Subject, UpdateSubjectInput};
pub use user::User;
