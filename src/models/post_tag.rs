use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents an association between a post and a tag
///
/// The creation time fixes the relation order of a post's tags.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::post_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostTag {
    /// The ID of the post
    post_id: String,

    /// The ID of the tag
    tag_id: String,

    /// When this post tag was created
    created_at: NaiveDateTime,
}

impl PostTag {
    /// Creates a new post tag association
    ///
    /// ### Arguments
    ///
    /// * `post_id` - The ID of the post
    /// * `tag_id` - The ID of the tag
    pub fn new(post_id: String, tag_id: String) -> Self {
        Self {
            post_id,
            tag_id,
            created_at: Utc::now().naive_utc(),
        }
    }
}
