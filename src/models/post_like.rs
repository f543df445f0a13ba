use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Records that a user liked a post
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::post_likes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostLike {
    post_id: String,
    user_id: String,
    created_at: NaiveDateTime,
}

impl PostLike {
    pub fn new(post_id: String, user_id: String) -> Self {
        Self {
            post_id,
            user_id,
            created_at: Utc::now().naive_utc(),
        }
    }
}
