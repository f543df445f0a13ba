use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a tag that labels posts
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    /// Unique identifier for the tag (UUID v4 as string)
    id: String,

    /// The unique label of the tag, also used in the tag page URL
    title: String,
}

impl Tag {
    /// Creates a new tag
    ///
    /// ### Arguments
    ///
    /// * `title` - The label of the tag
    ///
    /// ### Returns
    ///
    /// A new `Tag` instance with a fresh id
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
        }
    }

    /// Gets the tag's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the tag's title
    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    /// Borrows the tag's title
    pub fn title(&self) -> &str {
        &self.title
    }
}
