//! Common test utilities for blog integration tests
//!
//! Every test gets its own on-disk SQLite database and media/static
//! directories inside a temporary directory, so tests are isolated and need
//! no cleanup.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use blog::{
    create_app,
    db::{init_pool, DbPool},
    dto::NewPostDto,
    models::Post,
    repo, run_migrations, AppState,
};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::Service;

/// A running blog backed by a temporary database
pub struct TestBlog {
    pub app: Router,
    pub pool: Arc<DbPool>,
    pub dir: TempDir,
}

impl TestBlog {
    /// Path of the database file
    pub fn database_path(&self) -> PathBuf {
        self.dir.path().join("blog.db")
    }
}

/// Creates a test application with a fresh database and asset directories
///
/// A stylesheet is written to the static root and an image to the media root
/// so file serving can be exercised.
pub fn create_test_blog() -> TestBlog {
    let dir = tempfile::tempdir().unwrap();
    let database_url = dir.path().join("blog.db").to_string_lossy().to_string();

    let pool = Arc::new(init_pool(&database_url).unwrap());
    let conn = &mut pool.get().unwrap();
    run_migrations(conn).unwrap();

    let media_root = dir.path().join("media");
    let static_root = dir.path().join("static");
    fs::create_dir_all(media_root.join("posts")).unwrap();
    fs::create_dir_all(static_root.join("css")).unwrap();
    fs::write(media_root.join("posts/cover.jpg"), b"not really a jpeg").unwrap();
    fs::write(static_root.join("css/blog.css"), "body { margin: 0; }").unwrap();

    let state = AppState {
        pool: pool.clone(),
        media_url: "/media/".to_string(),
        media_root,
        static_root,
    };

    TestBlog {
        app: create_app(state),
        pool,
        dir,
    }
}

/// Sends a GET request and returns the status and body text
pub async fn get(app: &mut Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// A fixed reference instant, offset by whole hours
pub fn at_hour(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::hours(hours)
}

/// Creates a user unless it already exists
pub fn ensure_user(pool: &DbPool, username: &str) {
    if repo::get_user_by_username(pool, username).unwrap().is_none() {
        repo::create_user(pool, username.to_string()).unwrap();
    }
}

/// Creates a post, its author and any missing tags
pub fn publish(
    pool: &DbPool,
    title: &str,
    text: &str,
    tags: &[&str],
    published_at: DateTime<Utc>,
) -> Post {
    ensure_user(pool, "author");
    for tag in tags {
        if repo::get_tag_by_title(pool, tag).unwrap().is_none() {
            repo::create_tag(pool, tag.to_string()).unwrap();
        }
    }

    repo::create_post(
        pool,
        NewPostDto {
            title: title.to_string(),
            text: text.to_string(),
            published_at: Some(published_at),
            author: "author".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        },
    )
    .unwrap()
}

/// Adds `count` likes to a post from fresh users
pub fn like(pool: &DbPool, post: &Post, count: usize) {
    for i in 0..count {
        let username = format!("reader-{}-{}", post.get_slug(), i);
        ensure_user(pool, &username);
        repo::like_post(pool, &post.get_slug(), &username).unwrap();
    }
}
