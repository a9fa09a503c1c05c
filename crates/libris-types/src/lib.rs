//! Domain records for the Libris library-management persistence layer.
//!
//! This crate provides the plain value objects shared across the workspace:
//! users, catalog entries (authors, genres), books, and rentals. Records are
//! immutable once constructed and carry no behavior beyond construction and
//! accessors; all persistence logic lives in `libris-store`.
//!
//! No crate in the workspace depends on anything *except* `libris-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced when reconstructing domain records from stored values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A stored password digest did not have the expected shape.
    #[error("invalid password digest: expected {expected} lowercase hex chars, got {got}")]
    MalformedDigest {
        /// The required digest length in hex characters.
        expected: usize,
        /// The length actually found.
        got: usize,
    },
}

/// A one-way SHA-256 password digest, stored as 64 lowercase hex characters.
///
/// The plaintext password never leaves [`PasswordHash::digest`]; every code
/// path that persists or compares a password goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Length of the digest in hex characters.
    pub const HEX_LEN: usize = 64;

    /// Hashes a plaintext password into a digest.
    pub fn digest(plaintext: &str) -> Self {
        Self(hex::encode(Sha256::digest(plaintext.as_bytes())))
    }

    /// Wraps a digest read back from storage, verifying its shape.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MalformedDigest`] if `stored` is not exactly
    /// [`Self::HEX_LEN`] lowercase hex characters.
    pub fn from_stored(stored: &str) -> Result<Self, RecordError> {
        let ok = stored.len() == Self::HEX_LEN
            && stored
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !ok {
            return Err(RecordError::MalformedDigest {
                expected: Self::HEX_LEN,
                got: stored.len(),
            });
        }
        Ok(Self(stored.to_string()))
    }

    /// Returns the digest as a hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a plaintext candidate against this digest.
    pub fn matches(&self, plaintext: &str) -> bool {
        Self::digest(plaintext).0 == self.0
    }
}

/// A registered library user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate id, unique within the users table.
    pub user_id: i64,
    /// Login name, unique within the users table.
    pub username: String,
    /// One-way password digest. Plaintext is hashed at construction.
    pub password_hash: PasswordHash,
}

impl User {
    /// Builds a user record, hashing `plaintext` immediately.
    pub fn new(user_id: i64, username: impl Into<String>, plaintext: &str) -> Self {
        Self {
            user_id,
            username: username.into(),
            password_hash: PasswordHash::digest(plaintext),
        }
    }
}

/// The generic shape shared by all lendable items: identity, title, and the
/// author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Surrogate id of the item.
    pub item_id: i64,
    /// Item title.
    pub title: String,
    /// Author display name (resolved to a catalog row by the store).
    pub author: String,
}

/// A book in the catalog.
///
/// Composes [`LibraryItem`] rather than subclassing it: no polymorphic
/// dispatch happens across item kinds, so the specialization is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// The generic item fields (id, title, author name).
    pub item: LibraryItem,
    /// Year of publication, if known.
    pub publication_year: Option<i32>,
    /// Genre display name, if assigned.
    pub genre: Option<String>,
}

impl Book {
    /// Builds a book record.
    pub fn new(
        book_id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: Option<i32>,
        genre: Option<String>,
    ) -> Self {
        Self {
            item: LibraryItem {
                item_id: book_id,
                title: title.into(),
                author: author.into(),
            },
            publication_year,
            genre,
        }
    }

    /// Surrogate id of the book.
    pub fn book_id(&self) -> i64 {
        self.item.item_id
    }

    /// Book title.
    pub fn title(&self) -> &str {
        &self.item.title
    }

    /// Author display name.
    pub fn author(&self) -> &str {
        &self.item.author
    }
}

/// A catalog author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Surrogate id.
    pub author_id: i64,
    /// Display name, unique within the authors table.
    pub name: String,
}

/// A catalog genre row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Surrogate id.
    pub genre_id: i64,
    /// Display name, unique within the genres table.
    pub name: String,
}

/// A rental linking a book to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    /// Surrogate id.
    pub rental_id: i64,
    /// The rented book.
    pub book_id: i64,
    /// The renting user.
    pub user_id: i64,
    /// Date the book went out.
    pub rental_date: NaiveDate,
    /// Date the book came back; `None` means currently out.
    pub return_date: Option<NaiveDate>,
}

impl Rental {
    /// Whether the book is still out.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}
