//! Repository surface for the Libris library-management store.
//!
//! Free functions over a `rusqlite::Connection`, one module per entity
//! family: user accounts, the author/genre catalog, books, and rentals.
//! Connections come from `libris-db`, which also owns the schema; every
//! function here assumes migrations have been applied.
//!
//! Operations report their outcome explicitly through [`StoreError`]:
//! rejected input (a named missing field), a missing row, a rejected return
//! date, or the underlying SQLite error. Constraint violations (duplicate
//! username, duplicate catalog name, rentals blocking a delete) are ordinary
//! storage errors distinguishable via
//! [`StoreError::is_constraint_violation`].

mod books;
mod catalog;
mod error;
mod rentals;
mod users;

pub use books::{add_book, delete_book, get_all_books, get_book, save_book, update_book_info};
pub use catalog::{
    create_author, create_genre, list_authors, list_genres, save_author, save_genre,
};
pub use error::StoreError;
pub use rentals::{
    close_rental, create_rental, get_rental, rental_history_by_user, rented_titles_by_user,
    save_rental,
};
pub use users::{add_user, delete_user, get_user, save_user};
