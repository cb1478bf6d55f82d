//! HTTP API integration tests
//!
//! Runs the full router against an in-memory SQLite database. Each test gets
//! its own pool, so tests are independent and can run in parallel.

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use coursecat::api::{build_router, AppState};
use coursecat::db::repositories::{
    SqlxContentRepository, SqlxCourseRepository, SqlxItemRepository, SqlxModuleRepository,
    SqlxSubjectRepository, SqlxUserRepository, UserRepository,
};
use coursecat::db::{create_test_pool, migrations};
use coursecat::services::{
    ContentService, CourseService, ItemService, ModuleService, SubjectService,
};
use coursecat::views::ViewEngine;

/// Spin up a server over a fresh in-memory database, returning the seeded
/// owner's ID alongside it.
async fn test_server() -> (TestServer, i64) {
    let pool = create_test_pool().await.expect("test pool");
    migrations::run_migrations(&pool).await.expect("migrations");

    // There is no user API; seed the owner directly.
    let owner = SqlxUserRepository::new(pool.clone())
        .create("amy", "amy@example.com")
        .await
        .expect("owner");

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let subject_repo = SqlxSubjectRepository::boxed(pool.clone());
    let course_repo = SqlxCourseRepository::boxed(pool.clone());
    let module_repo = SqlxModuleRepository::boxed(pool.clone());
    let content_repo = SqlxContentRepository::boxed(pool.clone());
    let item_repo = SqlxItemRepository::boxed(pool.clone());

    let state = AppState {
        pool: pool.clone(),
        subject_service: Arc::new(SubjectService::new(subject_repo.clone())),
        course_service: Arc::new(CourseService::new(
            course_repo,
            subject_repo,
            user_repo,
            module_repo.clone(),
        )),
        module_service: Arc::new(ModuleService::new(module_repo)),
        content_service: Arc::new(ContentService::new(content_repo, item_repo.clone())),
        item_service: Arc::new(ItemService::new(item_repo)),
        views: Arc::new(ViewEngine::new().expect("view engine")),
    };

    let server = TestServer::new(build_router(state, "http://localhost:3000"))
        .expect("test server");
    (server, owner.id)
}

async fn create_subject(server: &TestServer, title: &str) -> Value {
    let response = server
        .post("/api/v1/subjects")
        .json(&json!({ "title": title }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

async fn create_course(server: &TestServer, owner_id: i64, subject_id: i64, title: &str) -> Value {
    let response = server
        .post("/api/v1/courses")
        .json(&json!({
            "owner_id": owner_id,
            "subject_id": subject_id,
            "title": title,
            "overview": format!("All about {}", title),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

async fn create_module(server: &TestServer, course_slug: &str, title: &str) -> Value {
    let response = server
        .post(&format!("/api/v1/courses/{}/modules", course_slug))
        .json(&json!({ "title": title }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_course_list_page_shows_courses() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;

    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Programming"));
    assert!(html.contains("Rust Basics"));
    assert!(html.contains("1 course"));
}

#[tokio::test]
async fn test_courses_list_newest_first() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    let subject_id = subject["id"].as_i64().unwrap();

    create_course(&server, owner_id, subject_id, "First").await;
    create_course(&server, owner_id, subject_id, "Second").await;
    create_course(&server, owner_id, subject_id, "Third").await;

    let response = server.get("/api/v1/courses").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let titles: Vec<&str> = body["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_modules_receive_sequential_orders() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;

    let a = create_module(&server, "rust-basics", "Intro").await;
    let b = create_module(&server, "rust-basics", "Ownership").await;
    let c = create_module(&server, "rust-basics", "Traits").await;

    assert_eq!(a["order"], 0);
    assert_eq!(b["order"], 1);
    assert_eq!(c["order"], 2);
}

#[tokio::test]
async fn test_explicit_module_order_is_kept() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;

    create_module(&server, "rust-basics", "Intro").await;
    let response = server
        .post("/api/v1/courses/rust-basics/modules")
        .json(&json!({ "title": "Jumped ahead", "order": 40 }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let jumped: Value = response.json();
    assert_eq!(jumped["order"], 40);

    // The next auto-assigned order continues after the gap.
    let next = create_module(&server, "rust-basics", "After the gap").await;
    assert_eq!(next["order"], 41);
}

#[tokio::test]
async fn test_course_detail_includes_ordered_modules() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;
    create_module(&server, "rust-basics", "Intro").await;
    create_module(&server, "rust-basics", "Ownership").await;

    let response = server.get("/api/v1/courses/rust-basics").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "Rust Basics");
    let modules = body["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["title"], "Intro");
    assert_eq!(modules[1]["title"], "Ownership");
}

#[tokio::test]
async fn test_unknown_course_returns_not_found() {
    let (server, _) = test_server().await;
    let response = server.get("/api/v1/courses/nope").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_subject_slug_conflicts() {
    let (server, _) = test_server().await;
    create_subject(&server, "Programming").await;

    let response = server
        .post("/api/v1/subjects")
        .json(&json!({ "title": "Programming" }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_item_kind_is_rejected() {
    let (server, owner_id) = test_server().await;

    let response = server
        .post("/api/v1/items/audio")
        .json(&json!({ "owner_id": owner_id, "title": "Podcast", "content": "x" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_content_flow_attach_list_and_dangle() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;
    let module = create_module(&server, "rust-basics", "Intro").await;
    let module_id = module["id"].as_i64().unwrap();

    let response = server
        .post("/api/v1/items/text")
        .json(&json!({ "owner_id": owner_id, "title": "Welcome", "content": "Hello" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let item: Value = response.json();
    assert_eq!(item["kind"], "text");
    let item_id = item["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/api/v1/modules/{}/contents", module_id))
        .json(&json!({ "item_kind": "text", "item_id": item_id }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let content: Value = response.json();
    assert_eq!(content["order"], 0);
    assert_eq!(content["item"]["title"], "Welcome");

    // Deleting the item leaves the content row with a null item.
    let response = server
        .delete(&format!("/api/v1/items/text/{}", item_id))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/modules/{}/contents", module_id))
        .await;
    response.assert_status_ok();
    let contents: Value = response.json();
    let contents = contents.as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert!(contents[0]["item"].is_null());
}

#[tokio::test]
async fn test_batch_module_reorder() {
    let (server, owner_id) = test_server().await;
    let subject = create_subject(&server, "Programming").await;
    create_course(&server, owner_id, subject["id"].as_i64().unwrap(), "Rust Basics").await;
    let a = create_module(&server, "rust-basics", "A").await;
    let b = create_module(&server, "rust-basics", "B").await;

    let response = server
        .post("/api/v1/modules/order")
        .json(&json!({ "items": [
            { "id": a["id"], "order": 1 },
            { "id": b["id"], "order": 0 },
        ]}))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server.get("/api/v1/courses/rust-basics/modules").await;
    response.assert_status_ok();
    let modules: Value = response.json();
    let titles: Vec<&str> = modules
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
}
