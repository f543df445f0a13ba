use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Data transfer object for creating a new post
///
/// The author and the tags are referenced by username and title, the way the
/// admin tool receives them.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewPostDto {
    /// The headline of the post
    pub title: String,

    /// Explicit slug; the slugified title is used when absent
    #[serde(default)]
    pub slug: Option<String>,

    /// The body of the post
    pub text: String,

    /// Image path relative to the media root
    #[serde(default)]
    pub image: Option<String>,

    /// Publication time; defaults to now
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Username of the author
    pub author: String,

    /// Titles of existing tags, in the order they should be listed
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Data transfer object for editing an existing post
///
/// Fields left as `None` keep their stored value. `image` is doubly optional
/// so an edit can also remove the image with `Some(None)`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PostUpdateDto {
    #[serde(default)]
    pub title: Option<String>,

    /// New slug, validated like one given on creation
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub image: Option<Option<String>>,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl PostUpdateDto {
    /// Whether the edit changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.text.is_none()
            && self.image.is_none()
            && self.published_at.is_none()
    }
}
