use crate::db::DbPool;
use crate::models::{Comment, CommentWithAuthor, Post, User};
use crate::schema::{comments, posts, users};
use anyhow::{anyhow, bail, Result};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Adds a comment to a post on behalf of a user
///
/// ### Errors
///
/// Returns an error if the text is blank, the post or user does not exist,
/// or the insert fails.
#[instrument(skip(pool, text))]
pub fn create_comment(pool: &DbPool, post_slug: &str, username: &str, text: String) -> Result<Comment> {
    if text.trim().is_empty() {
        bail!("Comment text must not be empty");
    }

    let conn = &mut pool.get()?;

    let post = posts::table
        .filter(posts::slug.eq(post_slug))
        .select(Post::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Post '{}' not found", post_slug))?;

    let author = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| anyhow!("User '{}' not found", username))?;

    let new_comment = Comment::new(post.get_id(), author.get_id(), text);
    diesel::insert_into(comments::table)
        .values(&new_comment)
        .execute(conn)?;

    info!("Created comment with id: {}", new_comment.get_id());
    Ok(new_comment)
}

/// Lists comments with their authors, newest first
///
/// ### Arguments
///
/// * `post_slug` - Restrict the listing to one post when given
#[instrument(skip(pool))]
pub fn list_comments(pool: &DbPool, post_slug: Option<&str>) -> Result<Vec<CommentWithAuthor>> {
    let conn = &mut pool.get()?;

    let mut query = comments::table
        .inner_join(users::table)
        .select((Comment::as_select(), User::as_select()))
        .order((comments::published_at.desc(), comments::id.asc()))
        .into_boxed();

    if let Some(slug) = post_slug {
        debug!("Filtering comments by post: {}", slug);
        let post_id = posts::table
            .filter(posts::slug.eq(slug))
            .select(posts::id)
            .first::<String>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Post '{}' not found", slug))?;
        query = query.filter(comments::post_id.eq(post_id));
    }

    let result = query
        .load::<(Comment, User)>(conn)?
        .into_iter()
        .map(|(comment, author)| CommentWithAuthor { comment, author })
        .collect::<Vec<_>>();

    debug!("Retrieved {} comments", result.len());
    Ok(result)
}

/// Replaces the text of a comment
///
/// ### Errors
///
/// Returns an error if the text is blank or the comment does not exist.
#[instrument(skip(pool, text))]
pub fn update_comment(pool: &DbPool, comment_id: &str, text: String) -> Result<Comment> {
    if text.trim().is_empty() {
        bail!("Comment text must not be empty");
    }

    let conn = &mut pool.get()?;
    let updated = diesel::update(comments::table.find(comment_id))
        .set(comments::text.eq(text))
        .execute(conn)?;
    if updated == 0 {
        bail!("Comment '{}' not found", comment_id);
    }

    let comment = comments::table
        .find(comment_id)
        .select(Comment::as_select())
        .first(conn)?;

    info!("Updated comment {}", comment_id);
    Ok(comment)
}

/// Deletes a comment by ID
#[instrument(skip(pool))]
pub fn delete_comment(pool: &DbPool, comment_id: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(comments::table.find(comment_id)).execute(conn)?;
    if deleted == 0 {
        bail!("Comment '{}' not found", comment_id);
    }
    info!("Deleted comment {}", comment_id);
    Ok(())
}
