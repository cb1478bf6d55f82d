//! Coursecat - A lightweight course catalog service

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursecat::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxContentRepository, SqlxCourseRepository, SqlxItemRepository, SqlxModuleRepository,
            SqlxSubjectRepository, SqlxUserRepository,
        },
    },
    services::{ContentService, CourseService, ItemService, ModuleService, SubjectService},
    views::ViewEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursecat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting coursecat catalog service...");

    // Load configuration (file is optional; env vars override)
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Ensure upload directories exist (item file paths point into these)
    std::fs::create_dir_all(&config.upload.files_dir)?;
    std::fs::create_dir_all(&config.upload.images_dir)?;

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let subject_repo = SqlxSubjectRepository::boxed(pool.clone());
    let course_repo = SqlxCourseRepository::boxed(pool.clone());
    let module_repo = SqlxModuleRepository::boxed(pool.clone());
    let content_repo = SqlxContentRepository::boxed(pool.clone());
    let item_repo = SqlxItemRepository::boxed(pool.clone());

    // Initialize services
    let subject_service = Arc::new(SubjectService::new(subject_repo.clone()));
    let course_service = Arc::new(CourseService::new(
        course_repo,
        subject_repo,
        user_repo,
        module_repo.clone(),
    ));
    let module_service = Arc::new(ModuleService::new(module_repo));
    let content_service = Arc::new(ContentService::new(content_repo, item_repo.clone()));
    let item_service = Arc::new(ItemService::new(item_repo));

    // Initialize view engine
    let views = Arc::new(ViewEngine::new()?);
    tracing::info!("View engine initialized");

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        subject_service,
        course_service,
        module_service,
        content_service,
        item_service,
        views,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
