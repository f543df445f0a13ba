use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::{debug, info, instrument};

use super::{load_sidebar, TAG_PAGE_POSTS_LIMIT};
use crate::errors::AppError;
use crate::repo;
use crate::serializers::serialize_post;
use crate::templates::{render_template, PostsListTemplate};
use crate::AppState;

/// Handler for the posts carrying a tag
///
/// This function handles GET requests to `/tags/{tag_title}/`. The title
/// must match exactly.
///
/// ### Returns
///
/// The rendered listing, or `AppError::NotFound` for an unknown tag
#[instrument(skip(state), fields(tag_title = %tag_title))]
pub async fn tag_filter_handler(
    State(state): State<AppState>,
    Path(tag_title): Path<String>,
) -> Result<Html<String>, AppError> {
    debug!("Rendering tag page");

    let tag = repo::get_tag_by_title(&state.pool, &tag_title)?.ok_or(AppError::NotFound)?;

    let (popular_tags, most_popular_posts) = load_sidebar(&state)?;

    let posts = repo::popular_posts_with_tag(&state.pool, &tag, TAG_PAGE_POSTS_LIMIT)?
        .iter()
        .map(|listing| serialize_post(listing, &state.media_url))
        .collect::<Vec<_>>();

    info!("Tag page lists {} posts", posts.len());

    render_template(PostsListTemplate {
        tag: tag.get_title(),
        popular_tags,
        posts,
        most_popular_posts,
    })
}
