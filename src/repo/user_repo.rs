use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use anyhow::{anyhow, bail, Result};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, info, instrument};

/// Creates a new user
///
/// ### Errors
///
/// Returns an error if the username is blank or already taken, or if the
/// insert fails.
#[instrument(skip(pool))]
pub fn create_user(pool: &DbPool, username: String) -> Result<User> {
    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("Username must not be empty");
    }

    let conn = &mut pool.get()?;
    let new_user = User::new(username);

    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                anyhow!("User '{}' already exists", new_user.get_username())
            }
            other => other.into(),
        })?;

    info!("Created user with id: {}", new_user.get_id());
    Ok(new_user)
}

/// Looks a user up by username
#[instrument(skip(pool))]
pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let user = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

/// Lists all users ordered by username
#[instrument(skip(pool))]
pub fn list_users(pool: &DbPool) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .order(users::username.asc())
        .select(User::as_select())
        .load(conn)?;
    debug!("Retrieved {} users", result.len());
    Ok(result)
}
