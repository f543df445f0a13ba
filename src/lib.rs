/// Blog: a small server-rendered blog
///
/// This library provides the data model, query layer, serializers and page
/// handlers of the blog, plus the configuration shared by the server and the
/// admin tool.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Posts, tags, comments, users and their enriched forms
/// - `repo`: Repository layer for database operations
/// - `serializers`: Flattening of loaded rows into template context
/// - `handlers`: Page handlers
///
/// ### Pages
///
/// - `GET /`: Most popular posts, freshest posts, popular tags
/// - `GET /posts/{slug}/`: A post with its comments and likes
/// - `GET /tags/{tag_title}/`: Posts carrying a tag
/// - `GET /contacts/`: Static contacts page

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects for write operations
pub mod dto;

/// Error handling module
pub mod errors;

/// Page handlers module
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Template context serialization module
pub mod serializers;

/// Page templates module
pub mod templates;

/// Public URL builders
pub mod urls;

#[cfg(test)]
pub mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use axum::{routing::get, Router};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Embedded migrations, applied at startup by both binaries
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    /// The database connection pool
    pub pool: Arc<db::DbPool>,
    /// Public prefix under which media files are served
    pub media_url: String,
    /// Directory holding uploaded media
    pub media_root: PathBuf,
    /// Directory holding stylesheets and other static assets
    pub static_root: PathBuf,
}

impl AppState {
    /// Creates state from the loaded configuration
    pub fn from_config(pool: Arc<db::DbPool>, config: &config::Config) -> Self {
        Self {
            pool,
            media_url: config.media_url.clone(),
            media_root: config.media_root.clone(),
            static_root: config.static_root.clone(),
        }
    }
}

/// Creates the application router with all routes
///
/// Every page answers both with and without a trailing slash. Unknown paths
/// render the 404 page.
pub fn create_app(state: AppState) -> Router {
    let media = ServeDir::new(&state.media_root);
    let assets = ServeDir::new(&state.static_root);

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/posts/{slug}", get(handlers::post_detail_handler))
        .route("/posts/{slug}/", get(handlers::post_detail_handler))
        .route("/tags/{tag_title}", get(handlers::tag_filter_handler))
        .route("/tags/{tag_title}/", get(handlers::tag_filter_handler))
        .route("/contacts", get(handlers::contacts_handler))
        .route("/contacts/", get(handlers::contacts_handler))
        .nest_service("/media", media)
        .nest_service("/static", assets)
        .fallback(handlers::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// ### Errors
///
/// Returns an error if a migration fails to apply.
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    info!("Applied {} pending migrations", applied.len());
    Ok(())
}
