//! Rental persistence and the rented-books join queries.

use chrono::NaiveDate;
use libris_types::Rental;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreError;

/// Inserts a rental with no return date (the book goes out), returning the
/// assigned rental id.
///
/// `book_id` and `user_id` must reference existing rows; an unknown id is a
/// constraint-violation storage error.
pub fn create_rental(
    conn: &Connection,
    book_id: i64,
    user_id: i64,
    rental_date: NaiveDate,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO rentals (book_id, user_id, rental_date) VALUES (?1, ?2, ?3)",
        params![book_id, user_id, rental_date],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Records the return date on a rental.
///
/// Rejects a `return_date` earlier than the stored rental date. No further
/// workflow is attached; this is a plain field update.
pub fn close_rental(
    conn: &Connection,
    rental_id: i64,
    return_date: NaiveDate,
) -> Result<(), StoreError> {
    let rental_date: NaiveDate = conn
        .query_row(
            "SELECT rental_date FROM rentals WHERE rental_id = ?1",
            [rental_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "rental",
            id: rental_id,
        })?;

    if return_date < rental_date {
        return Err(StoreError::ReturnBeforeRental {
            rental_date,
            return_date,
        });
    }

    conn.execute(
        "UPDATE rentals SET return_date = ?1 WHERE rental_id = ?2",
        params![return_date, rental_id],
    )?;
    Ok(())
}

/// Retrieves a rental by id.
pub fn get_rental(conn: &Connection, rental_id: i64) -> Result<Rental, StoreError> {
    conn.query_row(
        "SELECT rental_id, book_id, user_id, rental_date, return_date
         FROM rentals WHERE rental_id = ?1",
        [rental_id],
        map_row_to_rental,
    )
    .optional()?
    .ok_or(StoreError::NotFound {
        entity: "rental",
        id: rental_id,
    })
}

/// Titles of the books a user currently has out (open rentals only).
pub fn rented_titles_by_user(conn: &Connection, user_id: i64) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT b.title
         FROM rentals r
         JOIN books b ON r.book_id = b.book_id
         WHERE r.user_id = ?1 AND r.return_date IS NULL
         ORDER BY r.rental_id ASC",
    )?;

    let rows = stmt.query_map([user_id], |row| row.get(0))?;
    let mut titles = Vec::new();
    for row in rows {
        titles.push(row?);
    }
    Ok(titles)
}

/// Every rental a user has ever had, returned ones included.
pub fn rental_history_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Rental>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT rental_id, book_id, user_id, rental_date, return_date
         FROM rentals WHERE user_id = ?1 ORDER BY rental_id ASC",
    )?;

    let rows = stmt.query_map([user_id], map_row_to_rental)?;
    let mut rentals = Vec::new();
    for row in rows {
        rentals.push(row?);
    }
    Ok(rentals)
}

/// Writes a rental record carrying its own id (seeding/restore path).
///
/// Unlike [`create_rental`], the record may already hold a return date.
pub fn save_rental(conn: &Connection, rental: &Rental) -> Result<(), StoreError> {
    if let Some(return_date) = rental.return_date {
        if return_date < rental.rental_date {
            return Err(StoreError::ReturnBeforeRental {
                rental_date: rental.rental_date,
                return_date,
            });
        }
    }

    conn.execute(
        "INSERT INTO rentals (rental_id, book_id, user_id, rental_date, return_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rental.rental_id,
            rental.book_id,
            rental.user_id,
            rental.rental_date,
            rental.return_date
        ],
    )?;
    Ok(())
}

fn map_row_to_rental(row: &Row) -> rusqlite::Result<Rental> {
    Ok(Rental {
        rental_id: row.get(0)?,
        book_id: row.get(1)?,
        user_id: row.get(2)?,
        rental_date: row.get(3)?,
        return_date: row.get(4)?,
    })
}
