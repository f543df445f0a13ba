//! Page templates and their contexts.

use askama::Template;
use axum::response::Html;

use crate::errors::AppError;
use crate::serializers::{SerializedPost, SerializedPostDetail, SerializedTag};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub most_popular_posts: Vec<SerializedPost>,
    pub page_posts: Vec<SerializedPost>,
    pub popular_tags: Vec<SerializedTag>,
}

#[derive(Template)]
#[template(path = "post-details.html")]
pub struct PostDetailsTemplate {
    pub post: SerializedPostDetail,
    pub popular_tags: Vec<SerializedTag>,
    pub most_popular_posts: Vec<SerializedPost>,
}

#[derive(Template)]
#[template(path = "posts-list.html")]
pub struct PostsListTemplate {
    pub tag: String,
    pub popular_tags: Vec<SerializedTag>,
    pub posts: Vec<SerializedPost>,
    pub most_popular_posts: Vec<SerializedPost>,
}

#[derive(Template)]
#[template(path = "contacts.html")]
pub struct ContactsTemplate;

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

/// Renders a template into an HTML response body
pub fn render_template<T: Template>(template: T) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(AppError::Template)
}
