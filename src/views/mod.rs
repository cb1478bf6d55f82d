//! HTML views
//!
//! This module provides template rendering using Tera. Templates are
//! compiled into the binary; the only page is the course list at `/`,
//! which shows every course grouped under its subject, newest first.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::error::Error as _;
use tera::{Context as TeraContext, Tera};
use tracing::error;

use crate::api::AppState;

/// Compiled-in course list template
const COURSE_LIST_TEMPLATE: &str = include_str!("../../templates/course_list.html");

/// Template rendering engine
pub struct ViewEngine {
    tera: Tera,
}

impl ViewEngine {
    /// Create the engine with all built-in templates registered
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("course_list.html", COURSE_LIST_TEMPLATE)
            .map_err(|e| anyhow::anyhow!("Failed to register template: {}", e))?;
        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> anyhow::Result<String> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            anyhow::anyhow!(error_msg)
        })
    }
}

/// GET / - HTML course list
///
/// Lists subjects alphabetically with their courses newest first, plus an
/// all-courses listing.
pub async fn course_list_page(State(state): State<AppState>) -> Response {
    match render_course_list(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Course list rendering failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Internal Server Error</h1>".to_string()),
            )
                .into_response()
        }
    }
}

async fn render_course_list(state: &AppState) -> anyhow::Result<String> {
    let subjects = state.subject_service.list().await?;
    let courses = state.course_service.list().await?;

    let mut sections = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        let subject_courses: Vec<_> = courses
            .iter()
            .filter(|c| c.subject_id == subject.id)
            .collect();
        sections.push(serde_json::json!({
            "subject": subject,
            "courses": subject_courses,
        }));
    }

    let mut context = TeraContext::new();
    context.insert("sections", &sections);
    context.insert("total_courses", &courses.len());

    state.views.render("course_list.html", &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_registers_templates() {
        let engine = ViewEngine::new().expect("engine");
        let mut context = TeraContext::new();
        context.insert("sections", &Vec::<tera::Value>::new());
        context.insert("total_courses", &0);

        let html = engine.render("course_list.html", &context).expect("render");
        assert!(html.contains("Courses"));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let engine = ViewEngine::new().expect("engine");
        let context = TeraContext::new();
        assert!(engine.render("missing.html", &context).is_err());
    }
}
