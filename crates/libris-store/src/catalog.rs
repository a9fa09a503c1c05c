//! Author and genre catalog operations.
//!
//! Books reference these tables by surrogate id; [`ensure_author`] and
//! [`ensure_genre`] resolve display names to ids, inserting the row on first
//! sight so callers can keep speaking names.

use libris_types::{Author, Genre};
use rusqlite::Connection;

use crate::error::{require_text, StoreError};

/// Inserts a new author with a unique name, returning its assigned id.
///
/// A duplicate name surfaces as a constraint-violation storage error.
pub fn create_author(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    require_text("author", name)?;
    conn.execute("INSERT INTO authors (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a new genre with a unique name, returning its assigned id.
///
/// A duplicate name surfaces as a constraint-violation storage error.
pub fn create_genre(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    require_text("genre", name)?;
    conn.execute("INSERT INTO genres (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

/// Lists all authors, ordered by name.
pub fn list_authors(conn: &Connection) -> Result<Vec<Author>, StoreError> {
    let mut stmt = conn.prepare("SELECT author_id, name FROM authors ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Author {
            author_id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    let mut authors = Vec::new();
    for row in rows {
        authors.push(row?);
    }
    Ok(authors)
}

/// Lists all genres, ordered by name.
pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>, StoreError> {
    let mut stmt = conn.prepare("SELECT genre_id, name FROM genres ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Genre {
            genre_id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    let mut genres = Vec::new();
    for row in rows {
        genres.push(row?);
    }
    Ok(genres)
}

/// Writes an author record carrying its own id (seeding/restore path).
pub fn save_author(conn: &Connection, author: &Author) -> Result<(), StoreError> {
    require_text("author", &author.name)?;
    conn.execute(
        "INSERT INTO authors (author_id, name) VALUES (?1, ?2)",
        rusqlite::params![author.author_id, author.name],
    )?;
    Ok(())
}

/// Writes a genre record carrying its own id (seeding/restore path).
pub fn save_genre(conn: &Connection, genre: &Genre) -> Result<(), StoreError> {
    require_text("genre", &genre.name)?;
    conn.execute(
        "INSERT INTO genres (genre_id, name) VALUES (?1, ?2)",
        rusqlite::params![genre.genre_id, genre.name],
    )?;
    Ok(())
}

/// Resolves an author name to its id, inserting the row if absent.
pub(crate) fn ensure_author(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT OR IGNORE INTO authors (name) VALUES (?1)", [name])?;
    let id = conn.query_row(
        "SELECT author_id FROM authors WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Resolves a genre name to its id, inserting the row if absent.
pub(crate) fn ensure_genre(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT OR IGNORE INTO genres (name) VALUES (?1)", [name])?;
    let id = conn.query_row(
        "SELECT genre_id FROM genres WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(id)
}
