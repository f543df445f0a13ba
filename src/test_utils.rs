use crate::db::{self, DbPool};
use crate::dto::NewPostDto;
use crate::models::{Post, User};
use crate::{repo, run_migrations};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<DbPool> {
    // Plain ":memory:" gives each connection its own separate database, so
    // every pool gets a uniquely named shared-cache in-memory database instead.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    Arc::new(pool)
}

/// Creates a user with the given username
pub fn seed_user(pool: &DbPool, username: &str) -> User {
    repo::create_user(pool, username.to_string()).unwrap()
}

/// Creates a post published now, creating any missing tags first
pub fn seed_post(pool: &DbPool, title: &str, author: &str, tags: &[&str]) -> Post {
    seed_post_at(pool, title, author, tags, Utc::now())
}

/// Creates a post with an explicit publication time, creating any missing tags first
pub fn seed_post_at(
    pool: &DbPool,
    title: &str,
    author: &str,
    tags: &[&str],
    published_at: DateTime<Utc>,
) -> Post {
    for tag in tags {
        if repo::get_tag_by_title(pool, tag).unwrap().is_none() {
            repo::create_tag(pool, tag.to_string()).unwrap();
        }
    }

    repo::create_post(
        pool,
        NewPostDto {
            title: title.to_string(),
            slug: None,
            text: format!("Text of {}", title),
            image: None,
            published_at: Some(published_at),
            author: author.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        },
    )
    .unwrap()
}

/// Adds likes to a post from freshly created users
pub fn seed_likes(pool: &DbPool, post: &Post, count: usize) {
    for i in 0..count {
        let username = format!("fan-{}-{}", post.get_slug(), i);
        seed_user(pool, &username);
        repo::like_post(pool, &post.get_slug(), &username).unwrap();
    }
}

/// A fixed reference instant, offset by whole hours
pub fn hours_after_epoch(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::hours(hours)
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64).prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates arbitrary post text mixing ASCII, Cyrillic and emoji
pub fn arb_post_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,250}",
        "[а-яё ]{0,250}",
        "\\PC{0,400}",
    ]
}
