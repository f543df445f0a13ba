use axum::{extract::State, response::Html};
use tracing::{debug, info, instrument};

use super::{load_sidebar, TOP_POSTS_LIMIT};
use crate::errors::AppError;
use crate::repo;
use crate::serializers::serialize_post;
use crate::templates::{render_template, IndexTemplate};
use crate::AppState;

/// Handler for the front page
///
/// This function handles GET requests to `/`. It shows the most liked
/// posts, the freshest posts and the most used tags.
#[instrument(skip(state))]
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    debug!("Rendering index page");

    let (popular_tags, most_popular_posts) = load_sidebar(&state)?;

    let page_posts = repo::fresh_posts(&state.pool, TOP_POSTS_LIMIT)?
        .iter()
        .map(|listing| serialize_post(listing, &state.media_url))
        .collect::<Vec<_>>();

    info!(
        "Index page with {} popular and {} fresh posts",
        most_popular_posts.len(),
        page_posts.len()
    );

    render_template(IndexTemplate {
        most_popular_posts,
        page_posts,
        popular_tags,
    })
}
