use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reader's reply attached to exactly one post
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    /// Unique identifier for the comment (UUID v4 as string)
    id: String,

    /// The post this comment belongs to
    post_id: String,

    /// The user who wrote the comment
    author_id: String,

    /// The comment body
    text: String,

    /// When the comment was published
    published_at: NaiveDateTime,
}

impl Comment {
    /// Creates a new comment published now
    pub fn new(post_id: String, author_id: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            post_id,
            author_id,
            text,
            published_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_post_id(&self) -> String {
        self.post_id.clone()
    }

    pub fn get_author_id(&self) -> String {
        self.author_id.clone()
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_published_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.published_at, Utc)
    }
}
