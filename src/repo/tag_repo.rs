use std::collections::HashMap;

use crate::db::DbPool;
use crate::models::{Tag, TagWithCount};
use crate::schema::{post_tags, tags};
use anyhow::{anyhow, bail, Result};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// Creates a new tag in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `title` - The label for the new tag
///
/// ### Errors
///
/// Returns an error if:
/// - The title is blank or made only of dots
/// - A tag with the same title already exists
/// - The database insert operation fails
#[instrument(skip(pool))]
pub fn create_tag(pool: &DbPool, title: String) -> Result<Tag> {
    let title = normalize_title(&title)?;

    let conn = &mut pool.get()?;
    let new_tag = Tag::new(title);

    diesel::insert_into(tags::table)
        .values(&new_tag)
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                anyhow!("Tag '{}' already exists", new_tag.title())
            }
            other => other.into(),
        })?;

    info!("Created tag with id: {}", new_tag.get_id());
    Ok(new_tag)
}

/// Retrieves a tag by its exact title
///
/// ### Returns
///
/// `Ok(None)` when no tag carries that title
#[instrument(skip(pool))]
pub fn get_tag_by_title(pool: &DbPool, title: &str) -> Result<Option<Tag>> {
    let conn = &mut pool.get()?;
    let result = tags::table
        .filter(tags::title.eq(title))
        .select(Tag::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("Tag not found");
    }
    Ok(result)
}

/// Renames a tag; its post links stay in place
///
/// ### Errors
///
/// Returns an error if:
/// - The new title is blank or made only of dots
/// - The tag does not exist
/// - Another tag already carries the new title
#[instrument(skip(pool))]
pub fn rename_tag(pool: &DbPool, title: &str, new_title: String) -> Result<Tag> {
    let new_title = normalize_title(&new_title)?;
    let conn = &mut pool.get()?;

    let renamed = diesel::update(tags::table.filter(tags::title.eq(title)))
        .set(tags::title.eq(&new_title))
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                anyhow!("Tag '{}' already exists", new_title)
            }
            other => other.into(),
        })?;
    if renamed == 0 {
        bail!("Tag '{}' not found", title);
    }

    let tag = tags::table
        .filter(tags::title.eq(&new_title))
        .select(Tag::as_select())
        .first(conn)?;

    info!("Renamed tag {} to {}", title, new_title);
    Ok(tag)
}

/// Deletes a tag by title; its post links are removed with it
///
/// ### Errors
///
/// Returns an error if the tag does not exist or the delete fails.
#[instrument(skip(pool))]
pub fn delete_tag(pool: &DbPool, title: &str) -> Result<()> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(tags::table.filter(tags::title.eq(title))).execute(conn)?;
    if deleted == 0 {
        bail!("Tag '{}' not found", title);
    }
    info!("Deleted tag {}", title);
    Ok(())
}

/// Trims a tag title and checks it can stand as a URL path segment
///
/// `.` and `..` are path navigation, so titles made only of dots could never
/// be linked to.
fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Tag title must not be empty");
    }
    if title.chars().all(|c| c == '.') {
        bail!("Tag title '{}' cannot consist of dots only", title);
    }
    Ok(title.to_string())
}

#[derive(QueryableByName, Debug)]
struct RankedTag {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = BigInt)]
    posts_count: i64,
}

/// Returns the most popular tags with their post counts
///
/// Popularity is the number of posts carrying the tag. Ties are broken by
/// title so the order is stable.
#[instrument(skip(pool))]
pub fn popular_tags(pool: &DbPool, limit: i64) -> Result<Vec<TagWithCount>> {
    let conn = &mut pool.get()?;

    let ranked: Vec<RankedTag> = diesel::sql_query(
        "SELECT tags.id AS id, COUNT(post_tags.post_id) AS posts_count \
         FROM tags LEFT JOIN post_tags ON post_tags.tag_id = tags.id \
         GROUP BY tags.id \
         ORDER BY posts_count DESC, tags.title ASC \
         LIMIT ?",
    )
    .bind::<BigInt, _>(limit)
    .load(conn)?;

    let ids: Vec<String> = ranked.iter().map(|r| r.id.clone()).collect();
    let mut by_id: HashMap<String, Tag> = tags::table
        .filter(tags::id.eq_any(&ids))
        .select(Tag::as_select())
        .load(conn)?
        .into_iter()
        .map(|tag| (tag.get_id(), tag))
        .collect();

    let result = ranked
        .into_iter()
        .filter_map(|r| {
            by_id.remove(&r.id).map(|tag| TagWithCount {
                tag,
                posts_count: r.posts_count,
            })
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} popular tags", result.len());
    Ok(result)
}

/// Counts posts per tag for the given tag IDs in one grouped query
///
/// Tags without posts are absent from the map.
pub(crate) fn count_posts_per_tag(
    conn: &mut SqliteConnection,
    tag_ids: &[String],
) -> QueryResult<HashMap<String, i64>> {
    if tag_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let counts = post_tags::table
        .filter(post_tags::tag_id.eq_any(tag_ids))
        .group_by(post_tags::tag_id)
        .select((post_tags::tag_id, count_star()))
        .load::<(String, i64)>(conn)?;

    Ok(counts.into_iter().collect())
}

/// Loads the tags of each given post, in relation order, with post counts
///
/// Runs two queries regardless of how many posts are passed in.
pub(crate) fn tags_for_posts(
    conn: &mut SqliteConnection,
    post_ids: &[String],
) -> QueryResult<HashMap<String, Vec<TagWithCount>>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = post_tags::table
        .inner_join(tags::table)
        .filter(post_tags::post_id.eq_any(post_ids))
        .order((post_tags::created_at.asc(), tags::title.asc()))
        .select((post_tags::post_id, Tag::as_select()))
        .load::<(String, Tag)>(conn)?;

    let mut tag_ids: Vec<String> = links.iter().map(|(_, tag)| tag.get_id()).collect();
    tag_ids.sort();
    tag_ids.dedup();
    let counts = count_posts_per_tag(conn, &tag_ids)?;

    let mut result: HashMap<String, Vec<TagWithCount>> = HashMap::new();
    for (post_id, tag) in links {
        let posts_count = counts.get(&tag.get_id()).copied().unwrap_or(0);
        result.entry(post_id).or_default().push(TagWithCount { tag, posts_count });
    }
    Ok(result)
}
