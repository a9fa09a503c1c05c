//! User account persistence.

use libris_types::{PasswordHash, User};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{require_text, StoreError};

/// Inserts a new user, hashing the password before it reaches storage.
///
/// Returns the assigned user id. A duplicate username surfaces as a
/// constraint-violation storage error.
pub fn add_user(conn: &Connection, username: &str, password: &str) -> Result<i64, StoreError> {
    require_text("username", username)?;
    require_text("password", password)?;

    let hash = PasswordHash::digest(password);
    conn.execute(
        "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
        params![username, hash.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Retrieves a user by id.
pub fn get_user(conn: &Connection, user_id: i64) -> Result<User, StoreError> {
    conn.query_row(
        "SELECT user_id, username, password_hash FROM users WHERE user_id = ?1",
        [user_id],
        map_row_to_user,
    )
    .optional()?
    .ok_or(StoreError::NotFound {
        entity: "user",
        id: user_id,
    })
}

/// Deletes a user by id.
///
/// Fails with a constraint violation while rentals still reference the user
/// (restrict policy), and with [`StoreError::NotFound`] if the id is unknown.
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<(), StoreError> {
    let count = conn.execute("DELETE FROM users WHERE user_id = ?1", [user_id])?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "user",
            id: user_id,
        });
    }
    Ok(())
}

/// Writes a user record carrying its own id (seeding/restore path).
///
/// The record already holds a digest, so nothing is re-hashed.
pub fn save_user(conn: &Connection, user: &User) -> Result<(), StoreError> {
    require_text("username", &user.username)?;
    conn.execute(
        "INSERT INTO users (user_id, username, password_hash) VALUES (?1, ?2, ?3)",
        params![user.user_id, user.username, user.password_hash.as_str()],
    )?;
    Ok(())
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    let stored: String = row.get(2)?;
    let password_hash = PasswordHash::from_stored(&stored).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(User {
        user_id: row.get(0)?,
        username: row.get(1)?,
        password_hash,
    })
}
