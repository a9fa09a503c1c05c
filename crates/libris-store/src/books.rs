//! Book persistence.
//!
//! The public surface speaks author and genre *names*; writes resolve them to
//! catalog surrogate ids (creating catalog rows on first sight), and reads
//! join the names back. Referential integrity between books and the catalog
//! is enforced by the schema, not by convention.

use libris_types::Book;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::catalog::{ensure_author, ensure_genre};
use crate::error::{require_text, require_text_opt, StoreError};

/// Inserts a new book, returning its assigned id.
///
/// `publication_year` and `genre` are optional; a present-but-empty genre is
/// rejected. Unknown author/genre names are added to the catalog as part of
/// the same call.
pub fn add_book(
    conn: &Connection,
    title: &str,
    author: &str,
    publication_year: Option<i32>,
    genre: Option<&str>,
) -> Result<i64, StoreError> {
    require_text("title", title)?;
    require_text("author", author)?;
    require_text_opt("genre", genre)?;

    // Name resolution and the book write commit together; a failed write
    // leaves no freshly-created catalog rows behind.
    let tx = conn.unchecked_transaction()?;
    let author_id = ensure_author(&tx, author)?;
    let genre_id = genre.map(|g| ensure_genre(&tx, g)).transpose()?;

    tx.execute(
        "INSERT INTO books (title, author_id, publication_year, genre_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![title, author_id, publication_year, genre_id],
    )?;
    let book_id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(book_id)
}

/// Retrieves a book by id.
pub fn get_book(conn: &Connection, book_id: i64) -> Result<Book, StoreError> {
    conn.query_row(
        "SELECT b.book_id, b.title, a.name, b.publication_year, g.name
         FROM books b
         JOIN authors a ON b.author_id = a.author_id
         LEFT JOIN genres g ON b.genre_id = g.genre_id
         WHERE b.book_id = ?1",
        [book_id],
        map_row_to_book,
    )
    .optional()?
    .ok_or(StoreError::NotFound {
        entity: "book",
        id: book_id,
    })
}

/// Lists every book in the catalog, ordered by id.
pub fn get_all_books(conn: &Connection) -> Result<Vec<Book>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT b.book_id, b.title, a.name, b.publication_year, g.name
         FROM books b
         JOIN authors a ON b.author_id = a.author_id
         LEFT JOIN genres g ON b.genre_id = g.genre_id
         ORDER BY b.book_id ASC",
    )?;

    let rows = stmt.query_map([], map_row_to_book)?;
    let mut books = Vec::new();
    for row in rows {
        books.push(row?);
    }
    Ok(books)
}

/// Replaces every field of a book, keyed by id.
///
/// Same validation and name resolution as [`add_book`]. Fails with
/// [`StoreError::NotFound`] if the id is unknown.
pub fn update_book_info(
    conn: &Connection,
    book_id: i64,
    title: &str,
    author: &str,
    publication_year: Option<i32>,
    genre: Option<&str>,
) -> Result<(), StoreError> {
    require_text("title", title)?;
    require_text("author", author)?;
    require_text_opt("genre", genre)?;

    // Resolution and update share a transaction: an unknown book id rolls
    // back any catalog rows the resolution just created.
    let tx = conn.unchecked_transaction()?;
    let author_id = ensure_author(&tx, author)?;
    let genre_id = genre.map(|g| ensure_genre(&tx, g)).transpose()?;

    let count = tx.execute(
        "UPDATE books SET title = ?1, author_id = ?2, publication_year = ?3, genre_id = ?4
         WHERE book_id = ?5",
        params![title, author_id, publication_year, genre_id, book_id],
    )?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "book",
            id: book_id,
        });
    }
    tx.commit()?;
    Ok(())
}

/// Deletes a book by id.
///
/// Fails with a constraint violation while rentals still reference the book
/// (restrict policy), and with [`StoreError::NotFound`] if the id is unknown.
pub fn delete_book(conn: &Connection, book_id: i64) -> Result<(), StoreError> {
    let count = conn.execute("DELETE FROM books WHERE book_id = ?1", [book_id])?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "book",
            id: book_id,
        });
    }
    Ok(())
}

/// Writes a book record carrying its own id (seeding/restore path).
///
/// Author/genre names are resolved against the catalog exactly as in
/// [`add_book`].
pub fn save_book(conn: &Connection, book: &Book) -> Result<(), StoreError> {
    require_text("title", book.title())?;
    require_text("author", book.author())?;
    require_text_opt("genre", book.genre.as_deref())?;

    let tx = conn.unchecked_transaction()?;
    let author_id = ensure_author(&tx, book.author())?;
    let genre_id = book
        .genre
        .as_deref()
        .map(|g| ensure_genre(&tx, g))
        .transpose()?;

    tx.execute(
        "INSERT INTO books (book_id, title, author_id, publication_year, genre_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            book.book_id(),
            book.title(),
            author_id,
            book.publication_year,
            genre_id
        ],
    )?;
    tx.commit()?;
    Ok(())
}

fn map_row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book::new(
        row.get(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}
