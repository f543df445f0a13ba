/// Page Handlers
///
/// This module contains the handlers for the public pages. Each handler
/// loads what its page shows through the repository layer, serializes it
/// and renders the page template.

mod index_handlers;
mod post_handlers;
mod tag_handlers;
mod static_handlers;

// Re-export all handlers
pub use index_handlers::*;
pub use post_handlers::*;
pub use tag_handlers::*;
pub use static_handlers::*;

/// Number of entries in the "most popular" and "fresh" post blocks
pub const TOP_POSTS_LIMIT: i64 = 5;

/// Number of entries in the popular tags block
pub const TOP_TAGS_LIMIT: i64 = 5;

/// Number of posts listed on a tag page
pub const TAG_PAGE_POSTS_LIMIT: i64 = 20;

use crate::errors::AppError;
use crate::repo;
use crate::serializers::{serialize_post, serialize_tag, SerializedPost, SerializedTag};
use crate::AppState;

/// Loads the popular tags and popular posts shown beside every listing page
pub(crate) fn load_sidebar(state: &AppState) -> Result<(Vec<SerializedTag>, Vec<SerializedPost>), AppError> {
    let popular_tags = repo::popular_tags(&state.pool, TOP_TAGS_LIMIT)?
        .iter()
        .map(serialize_tag)
        .collect();

    let most_popular_posts = repo::popular_posts(&state.pool, TOP_POSTS_LIMIT)?
        .iter()
        .map(|listing| serialize_post(listing, &state.media_url))
        .collect();

    Ok((popular_tags, most_popular_posts))
}
