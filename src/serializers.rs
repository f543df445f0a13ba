//! Flattens loaded entities into the plain records templates render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CommentWithAuthor, PostDetails, PostListing, TagWithCount};
use crate::urls::{media_url, post_url, tag_url};

/// Number of characters of a post's text shown in listings
pub const TEASER_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedTag {
    pub title: String,
    pub posts_with_tag: i64,
    pub url: String,
}

/// A post as it appears in listings and sidebars
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedPost {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub url: String,
    pub tags: Vec<SerializedTag>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedComment {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// A post as its detail page shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedPostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<SerializedComment>,
    pub comments_amount: i64,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<SerializedTag>,
}

/// Returns the first [`TEASER_LENGTH`] characters of a text
pub fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LENGTH).collect()
}

pub fn serialize_tag(tag: &TagWithCount) -> SerializedTag {
    SerializedTag {
        title: tag.tag.get_title(),
        posts_with_tag: tag.posts_count,
        url: tag_url(tag.tag.title()),
    }
}

/// Serializes a listed post
///
/// `media_base` is the public prefix image paths are resolved against.
pub fn serialize_post(listing: &PostListing, media_base: &str) -> SerializedPost {
    let post = &listing.post;
    SerializedPost {
        title: post.get_title(),
        teaser_text: teaser(post.text()),
        author: listing.author.get_username(),
        comments_amount: listing.comments_count,
        image_url: post.get_image().map(|path| media_url(media_base, &path)),
        published_at: post.get_published_at(),
        slug: post.get_slug(),
        url: post_url(&post.get_slug()),
        tags: listing.tags.iter().map(serialize_tag).collect(),
        first_tag_title: listing.tags.first().map(|t| t.tag.get_title()),
    }
}

pub fn serialize_comment(comment: &CommentWithAuthor) -> SerializedComment {
    SerializedComment {
        text: comment.comment.get_text(),
        published_at: comment.comment.get_published_at(),
        author: comment.author.get_username(),
    }
}

pub fn serialize_post_detail(details: &PostDetails, media_base: &str) -> SerializedPostDetail {
    let post = &details.post;
    SerializedPostDetail {
        title: post.get_title(),
        text: post.get_text(),
        author: details.author.get_username(),
        comments: details.comments.iter().map(serialize_comment).collect(),
        comments_amount: details.comments_count,
        likes_amount: details.likes_count,
        image_url: post.get_image().map(|path| media_url(media_base, &path)),
        published_at: post.get_published_at(),
        slug: post.get_slug(),
        tags: details.tags.iter().map(serialize_tag).collect(),
    }
}
