use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a blog post
///
/// This struct maps directly to the `posts` table. Tags, likes and comments
/// live in their own tables and are loaded by the repository layer.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    /// Unique identifier for the post (UUID v4 as string)
    id: String,

    /// The headline of the post
    title: String,

    /// Unique, URL-safe identifier used in the post's address
    slug: String,

    /// The full body of the post
    text: String,

    /// Image path relative to the media root, if the post has one
    image: Option<String>,

    /// When the post was published
    published_at: NaiveDateTime,

    /// The user who wrote the post
    author_id: String,
}

impl Post {
    /// Creates a new post with a fresh id
    ///
    /// ### Arguments
    ///
    /// * `title` - The headline of the post
    /// * `slug` - The URL identifier; callers validate it with [`is_valid_slug`]
    /// * `text` - The body of the post
    /// * `image` - Optional image path relative to the media root
    /// * `published_at` - Publication timestamp
    /// * `author_id` - ID of the authoring user
    pub fn new(
        title: String,
        slug: String,
        text: String,
        image: Option<String>,
        published_at: DateTime<Utc>,
        author_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            slug,
            text,
            image,
            published_at: published_at.naive_utc(),
            author_id,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_slug(&self) -> String {
        self.slug.clone()
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    /// Borrows the body of the post
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn get_image(&self) -> Option<String> {
        self.image.clone()
    }

    pub fn get_author_id(&self) -> String {
        self.author_id.clone()
    }

    /// Gets the publication timestamp as a DateTime<Utc>
    pub fn get_published_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.published_at, Utc)
    }
}

/// Checks that a slug is non-empty and already in canonical slug form
///
/// Canonical form is lowercase ASCII letters, digits and single hyphens,
/// with no leading or trailing hyphen.
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty() && slug::slugify(candidate) == candidate
}
