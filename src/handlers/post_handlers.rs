use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::{debug, instrument};

use super::load_sidebar;
use crate::errors::AppError;
use crate::repo;
use crate::serializers::serialize_post_detail;
use crate::templates::{render_template, PostDetailsTemplate};
use crate::AppState;

/// Handler for a post's detail page
///
/// This function handles GET requests to `/posts/{slug}/`.
///
/// ### Returns
///
/// The rendered page, or `AppError::NotFound` when no post has the slug
#[instrument(skip(state), fields(slug = %slug))]
pub async fn post_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    debug!("Rendering post detail page");

    let details = repo::get_post_details(&state.pool, &slug)?.ok_or(AppError::NotFound)?;
    let post = serialize_post_detail(&details, &state.media_url);

    let (popular_tags, most_popular_posts) = load_sidebar(&state)?;

    render_template(PostDetailsTemplate {
        post,
        popular_tags,
        most_popular_posts,
    })
}
