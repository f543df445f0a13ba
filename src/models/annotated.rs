//! Rows enriched with related entities and query-time aggregates.
//!
//! None of these are stored; the repository layer builds them with a fixed
//! number of queries per page.

use serde::Serialize;

use super::{Comment, Post, Tag, User};

/// A tag together with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    pub tag: Tag,
    pub posts_count: i64,
}

/// A post with everything a listing card shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListing {
    pub post: Post,
    pub author: User,
    /// Tags in relation order
    pub tags: Vec<TagWithCount>,
    pub comments_count: i64,
}

/// A comment with its author loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}

/// A post with everything its detail page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetails {
    pub post: Post,
    pub author: User,
    /// Tags in relation order
    pub tags: Vec<TagWithCount>,
    /// Comments, oldest first
    pub comments: Vec<CommentWithAuthor>,
    pub comments_count: i64,
    pub likes_count: i64,
}
