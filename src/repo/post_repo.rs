use std::collections::HashMap;

use crate::db::DbPool;
use crate::dto::{NewPostDto, PostUpdateDto};
use crate::models::{
    is_valid_slug, Comment, CommentWithAuthor, Post, PostDetails, PostLike, PostListing, PostTag,
    Tag, User,
};
use crate::schema::{comments, post_likes, post_tags, posts, tags, users};
use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use super::tag_repo::tags_for_posts;

/// Creates a new post together with its tag links
///
/// The slug defaults to the slugified title. The author and every tag must
/// already exist. Everything is written in one transaction.
///
/// ### Errors
///
/// Returns an error if:
/// - The title is blank
/// - The slug is not URL-safe or is already taken
/// - The author or one of the tags does not exist
/// - The database insert operation fails
#[instrument(skip(pool, dto), fields(title = %dto.title))]
pub fn create_post(pool: &DbPool, dto: NewPostDto) -> Result<Post> {
    let title = dto.title.trim().to_string();
    if title.is_empty() {
        bail!("Post title must not be empty");
    }

    let slug = dto.slug.unwrap_or_else(|| slug::slugify(&title));
    if !is_valid_slug(&slug) {
        bail!("Slug '{}' is not URL-safe", slug);
    }

    let conn = &mut pool.get()?;

    let post = conn.transaction::<_, anyhow::Error, _>(|conn| {
        let author = users::table
            .filter(users::username.eq(&dto.author))
            .select(User::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| anyhow!("User '{}' not found", dto.author))?;

        let new_post = Post::new(
            title,
            slug,
            dto.text,
            dto.image,
            dto.published_at.unwrap_or_else(Utc::now),
            author.get_id(),
        );

        diesel::insert_into(posts::table)
            .values(&new_post)
            .execute(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    anyhow!("A post with slug '{}' already exists", new_post.get_slug())
                }
                other => other.into(),
            })?;

        for tag_title in &dto.tags {
            let tag = find_tag(conn, tag_title)?;
            diesel::insert_or_ignore_into(post_tags::table)
                .values(PostTag::new(new_post.get_id(), tag.get_id()))
                .execute(conn)?;
        }

        Ok(new_post)
    })?;

    info!("Created post with slug: {}", post.get_slug());
    Ok(post)
}

/// Retrieves a post by slug
#[instrument(skip(pool))]
pub fn get_post_by_slug(pool: &DbPool, slug: &str) -> Result<Option<Post>> {
    let conn = &mut pool.get()?;
    Ok(find_post(conn, slug)?)
}

/// Lists every post, newest first
#[instrument(skip(pool))]
pub fn list_posts(pool: &DbPool) -> Result<Vec<Post>> {
    let conn = &mut pool.get()?;
    let result = posts::table
        .order((posts::published_at.desc(), posts::id.asc()))
        .select(Post::as_select())
        .load(conn)?;
    debug!("Retrieved {} posts", result.len());
    Ok(result)
}

/// Edits an existing post
///
/// Only the fields set in `dto` change. A new title does not change the
/// slug; a new slug must be URL-safe and unused.
///
/// ### Errors
///
/// Returns an error if:
/// - The edit changes nothing
/// - The new title is blank
/// - The new slug is not URL-safe or is already taken
/// - The post does not exist
#[instrument(skip(pool, dto))]
pub fn update_post(pool: &DbPool, slug: &str, dto: PostUpdateDto) -> Result<Post> {
    if dto.is_empty() {
        bail!("Nothing to change for post '{}'", slug);
    }

    let title = match dto.title {
        Some(title) => {
            let title = title.trim().to_string();
            if title.is_empty() {
                bail!("Post title must not be empty");
            }
            Some(title)
        }
        None => None,
    };
    if let Some(new_slug) = &dto.slug {
        if !is_valid_slug(new_slug) {
            bail!("Slug '{}' is not URL-safe", new_slug);
        }
    }

    #[derive(AsChangeset)]
    #[diesel(table_name = posts)]
    struct PostChangeset {
        title: Option<String>,
        slug: Option<String>,
        text: Option<String>,
        image: Option<Option<String>>,
        published_at: Option<NaiveDateTime>,
    }

    let new_slug = dto.slug.clone().unwrap_or_else(|| slug.to_string());
    let changeset = PostChangeset {
        title,
        slug: dto.slug,
        text: dto.text,
        image: dto.image,
        published_at: dto.published_at.map(|at| at.naive_utc()),
    };

    let conn = &mut pool.get()?;
    let post = require_post(conn, slug)?;

    diesel::update(posts::table.find(post.get_id()))
        .set(changeset)
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                anyhow!("A post with slug '{}' already exists", new_slug)
            }
            other => other.into(),
        })?;

    let updated = posts::table
        .find(post.get_id())
        .select(Post::as_select())
        .first(conn)?;

    info!("Updated post {}", updated.get_slug());
    Ok(updated)
}

/// Deletes a post; its comments, likes and tag links go with it
#[instrument(skip(pool))]
pub fn delete_post(pool: &DbPool, slug: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(posts::table.filter(posts::slug.eq(slug))).execute(conn)?;
    if deleted == 0 {
        bail!("Post '{}' not found", slug);
    }
    info!("Deleted post {}", slug);
    Ok(())
}

/// Links a tag to a post; linking twice is a no-op
#[instrument(skip(pool))]
pub fn add_tag_to_post(pool: &DbPool, slug: &str, tag_title: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let post = require_post(conn, slug)?;
    let tag = find_tag(conn, tag_title)?;

    diesel::insert_or_ignore_into(post_tags::table)
        .values(PostTag::new(post.get_id(), tag.get_id()))
        .execute(conn)?;

    info!("Tagged post {} with {}", slug, tag_title);
    Ok(())
}

/// Unlinks a tag from a post
///
/// ### Errors
///
/// Returns an error if the post, the tag or the link does not exist.
#[instrument(skip(pool))]
pub fn remove_tag_from_post(pool: &DbPool, slug: &str, tag_title: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let post = require_post(conn, slug)?;
    let tag = find_tag(conn, tag_title)?;

    let deleted = diesel::delete(
        post_tags::table
            .filter(post_tags::post_id.eq(post.get_id()))
            .filter(post_tags::tag_id.eq(tag.get_id())),
    )
    .execute(conn)?;

    if deleted == 0 {
        bail!("Post '{}' is not tagged with '{}'", slug, tag_title);
    }
    Ok(())
}

/// Records that a user likes a post; liking twice is a no-op
#[instrument(skip(pool))]
pub fn like_post(pool: &DbPool, slug: &str, username: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let post = require_post(conn, slug)?;
    let user = find_user(conn, username)?;

    diesel::insert_or_ignore_into(post_likes::table)
        .values(PostLike::new(post.get_id(), user.get_id()))
        .execute(conn)?;
    Ok(())
}

/// Removes a user's like from a post
#[instrument(skip(pool))]
pub fn unlike_post(pool: &DbPool, slug: &str, username: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let post = require_post(conn, slug)?;
    let user = find_user(conn, username)?;

    let deleted = diesel::delete(
        post_likes::table
            .filter(post_likes::post_id.eq(post.get_id()))
            .filter(post_likes::user_id.eq(user.get_id())),
    )
    .execute(conn)?;

    if deleted == 0 {
        bail!("User '{}' does not like post '{}'", username, slug);
    }
    Ok(())
}

#[derive(QueryableByName, Debug)]
struct RankedPost {
    #[diesel(sql_type = Text)]
    id: String,
}

/// Returns the most liked posts, enriched for listing
///
/// Ranking is one aggregate query over likes; ties go to the newer post.
/// Authors, tags and comment counts are then fetched per relation.
#[instrument(skip(pool))]
pub fn popular_posts(pool: &DbPool, limit: i64) -> Result<Vec<PostListing>> {
    let conn = &mut pool.get()?;

    let ranked: Vec<RankedPost> = diesel::sql_query(
        "SELECT posts.id AS id FROM posts \
         LEFT JOIN post_likes ON post_likes.post_id = posts.id \
         GROUP BY posts.id \
         ORDER BY COUNT(post_likes.user_id) DESC, posts.published_at DESC, posts.id ASC \
         LIMIT ?",
    )
    .bind::<BigInt, _>(limit)
    .load(conn)?;

    let listings = load_ranked(conn, ranked)?;
    debug!("Retrieved {} popular posts", listings.len());
    Ok(listings)
}

/// Returns the most liked posts carrying the given tag
#[instrument(skip(pool, tag), fields(tag = %tag.title()))]
pub fn popular_posts_with_tag(pool: &DbPool, tag: &Tag, limit: i64) -> Result<Vec<PostListing>> {
    let conn = &mut pool.get()?;

    let ranked: Vec<RankedPost> = diesel::sql_query(
        "SELECT posts.id AS id FROM posts \
         INNER JOIN post_tags ON post_tags.post_id = posts.id AND post_tags.tag_id = ? \
         LEFT JOIN post_likes ON post_likes.post_id = posts.id \
         GROUP BY posts.id \
         ORDER BY COUNT(post_likes.user_id) DESC, posts.published_at DESC, posts.id ASC \
         LIMIT ?",
    )
    .bind::<Text, _>(tag.get_id())
    .bind::<BigInt, _>(limit)
    .load(conn)?;

    let listings = load_ranked(conn, ranked)?;
    debug!("Retrieved {} posts for tag", listings.len());
    Ok(listings)
}

/// Returns the most recently published posts, enriched for listing
#[instrument(skip(pool))]
pub fn fresh_posts(pool: &DbPool, limit: i64) -> Result<Vec<PostListing>> {
    let conn = &mut pool.get()?;

    let latest = posts::table
        .order((posts::published_at.desc(), posts::id.asc()))
        .limit(limit)
        .select(Post::as_select())
        .load(conn)?;

    let listings = with_listing_details(conn, latest)?;
    debug!("Retrieved {} fresh posts", listings.len());
    Ok(listings)
}

/// Loads everything the detail page needs for the post with the given slug
///
/// ### Returns
///
/// `Ok(None)` when no post has that slug
#[instrument(skip(pool))]
pub fn get_post_details(pool: &DbPool, slug: &str) -> Result<Option<PostDetails>> {
    let conn = &mut pool.get()?;

    let Some(post) = find_post(conn, slug)? else {
        debug!("Post not found");
        return Ok(None);
    };
    let post_id = post.get_id();

    let author = users::table
        .find(post.get_author_id())
        .select(User::as_select())
        .first(conn)?;

    let tags = tags_for_posts(conn, std::slice::from_ref(&post_id))?
        .remove(&post_id)
        .unwrap_or_default();

    let comments = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq(&post_id))
        .order((comments::published_at.asc(), comments::id.asc()))
        .select((Comment::as_select(), User::as_select()))
        .load::<(Comment, User)>(conn)?
        .into_iter()
        .map(|(comment, author)| CommentWithAuthor { comment, author })
        .collect::<Vec<_>>();

    let likes_count = post_likes::table
        .filter(post_likes::post_id.eq(&post_id))
        .count()
        .get_result::<i64>(conn)?;

    Ok(Some(PostDetails {
        post,
        author,
        tags,
        comments_count: comments.len() as i64,
        comments,
        likes_count,
    }))
}

/// Loads ranked posts and restores the ranking order
fn load_ranked(conn: &mut SqliteConnection, ranked: Vec<RankedPost>) -> Result<Vec<PostListing>> {
    let ids: Vec<String> = ranked.into_iter().map(|r| r.id).collect();

    let mut by_id: HashMap<String, Post> = posts::table
        .filter(posts::id.eq_any(&ids))
        .select(Post::as_select())
        .load(conn)?
        .into_iter()
        .map(|post| (post.get_id(), post))
        .collect();

    let ordered = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    with_listing_details(conn, ordered)
}

/// Attaches authors, tags and comment counts to already ordered posts
///
/// Issues one query per relation, independent of the number of posts.
fn with_listing_details(conn: &mut SqliteConnection, posts: Vec<Post>) -> Result<Vec<PostListing>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<String> = posts.iter().map(|p| p.get_id()).collect();
    let mut author_ids: Vec<String> = posts.iter().map(|p| p.get_author_id()).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<String, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?
        .into_iter()
        .map(|user| (user.get_id(), user))
        .collect();

    let mut tags = tags_for_posts(conn, &post_ids)?;
    let comment_counts = count_comments_per_post(conn, &post_ids)?;

    posts
        .into_iter()
        .map(|post| {
            let id = post.get_id();
            let author = authors
                .get(&post.get_author_id())
                .cloned()
                .ok_or_else(|| anyhow!("Post {} references a missing author", id))?;
            Ok(PostListing {
                author,
                tags: tags.remove(&id).unwrap_or_default(),
                comments_count: comment_counts.get(&id).copied().unwrap_or(0),
                post,
            })
        })
        .collect()
}

/// Counts comments per post in one grouped query
fn count_comments_per_post(
    conn: &mut SqliteConnection,
    post_ids: &[String],
) -> QueryResult<HashMap<String, i64>> {
    let counts = comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count_star()))
        .load::<(String, i64)>(conn)?;
    Ok(counts.into_iter().collect())
}

fn find_post(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Post>> {
    posts::table
        .filter(posts::slug.eq(slug))
        .select(Post::as_select())
        .first(conn)
        .optional()
}

fn require_post(conn: &mut SqliteConnection, slug: &str) -> Result<Post> {
    find_post(conn, slug)?.ok_or_else(|| anyhow!("Post '{}' not found", slug))
}

fn find_tag(conn: &mut SqliteConnection, title: &str) -> Result<Tag> {
    tags::table
        .filter(tags::title.eq(title))
        .select(Tag::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Tag '{}' not found", title))
}

fn find_user(conn: &mut SqliteConnection, username: &str) -> Result<User> {
    users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| anyhow!("User '{}' not found", username))
}
