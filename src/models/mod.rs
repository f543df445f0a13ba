/// Data models module
///
/// This module defines the entities persisted by the blog: users, posts,
/// tags and comments, plus the join rows for the post/tag and post/like
/// relations.

// Re-export all model types
mod user;
pub use user::User;

mod post;
pub use post::{is_valid_slug, Post};

mod tag;
pub use tag::Tag;

mod comment;
pub use comment::Comment;

mod post_tag;
pub use post_tag::PostTag;

mod post_like;
pub use post_like::PostLike;

mod annotated;
pub use annotated::{CommentWithAuthor, PostDetails, PostListing, TagWithCount};
