//! Subject service

use crate::db::repositories::SubjectRepository;
use crate::models::{CreateSubjectInput, Subject, UpdateSubjectInput};
use anyhow::Context;
use std::sync::Arc;

/// Error types for subject service operations
#[derive(Debug, thiserror::Error)]
pub enum SubjectServiceError {
    /// Subject slug already exists
    #[error("Subject slug already exists: {0}")]
    DuplicateSlug(String),

    /// Subject not found
    #[error("Subject not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Subject service for managing catalog subjects
pub struct SubjectService {
    repo: Arc<dyn SubjectRepository>,
}

impl SubjectService {
    /// Create a new subject service
    pub fn new(repo: Arc<dyn SubjectRepository>) -> Self {
        Self { repo }
    }

    /// Create a new subject.
    ///
    /// The slug is generated from the title when not provided, and must be
    /// unique either way.
    pub async fn create(&self, input: CreateSubjectInput) -> Result<Subject, SubjectServiceError> {
        if input.title.trim().is_empty() {
            return Err(SubjectServiceError::ValidationError(
                "Subject title cannot be empty".to_string(),
            ));
        }

        let slug = match input.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => generate_slug(&input.title),
        };

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(SubjectServiceError::DuplicateSlug(slug));
        }

        let created = self
            .repo
            .create(&input.title, &slug)
            .await
            .context("Failed to create subject")?;

        Ok(created)
    }

    /// Get subject by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Subject>, SubjectServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Get subject by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Subject>, SubjectServiceError> {
        Ok(self.repo.get_by_slug(slug).await?)
    }

    /// List all subjects, alphabetically by title
    pub async fn list(&self) -> Result<Vec<Subject>, SubjectServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Update a subject
    pub async fn update(
        &self,
        id: i64,
        input: UpdateSubjectInput,
    ) -> Result<Subject, SubjectServiceError> {
        let mut subject = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| SubjectServiceError::NotFound(id.to_string()))?;

        if let Some(title) = input.title {
            subject.title = title;
        }
        if let Some(slug) = input.slug {
            if slug != subject.slug {
                if self
                    .repo
                    .exists_by_slug(&slug)
                    .await
                    .context("Failed to check slug uniqueness")?
                {
                    return Err(SubjectServiceError::DuplicateSlug(slug));
                }
                subject.slug = slug;
            }
        }

        Ok(self.repo.update(&subject).await?)
    }

    /// Delete a subject and, via cascade, its courses
    pub async fn delete(&self, id: i64) -> Result<(), SubjectServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(SubjectServiceError::NotFound(id.to_string()));
        }
        Ok(self.repo.delete(id).await?)
    }
}

/// Generate a URL-friendly slug from a title.
///
/// Lowercases ASCII, keeps non-ASCII characters, and collapses everything
/// else into single hyphens.
pub fn generate_slug(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    // Remove consecutive hyphens and trim hyphens from ends
    let mut result = String::new();
    let mut prev_hyphen = false;

    for c in slug.chars() {
        if c == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push(c);
                prev_hyphen = true;
            }
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_end_matches('-').to_string()
}
