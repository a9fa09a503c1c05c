//! Error type shared by every store operation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every operation reports its outcome explicitly: a rejected input, a
/// missing row, and a storage failure are distinct variants, so callers can
/// branch rather than guessing from an empty result.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was absent or empty; storage was not touched.
    #[error("rejected: missing required field '{0}'")]
    MissingField(&'static str),

    /// The addressed row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"book"`.
        entity: &'static str,
        /// The surrogate id that was looked up.
        id: i64,
    },

    /// A return date earlier than the rental date was rejected.
    #[error("return date {return_date} precedes rental date {rental_date}")]
    ReturnBeforeRental {
        /// The stored rental date.
        rental_date: NaiveDate,
        /// The offending return date.
        return_date: NaiveDate,
    },

    /// The underlying SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether this error is a SQLite constraint violation (uniqueness or
    /// foreign-key), as opposed to any other storage failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Validates a required text field, reporting the field name on rejection.
///
/// The rejection is also logged, matching the diagnostic the operation would
/// otherwise leave no trace of when the caller discards the error.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        tracing::warn!(field, "operation rejected: missing required field");
        return Err(StoreError::MissingField(field));
    }
    Ok(())
}

/// Validates an optional text field: absent is fine, present-but-empty is not.
pub(crate) fn require_text_opt(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), StoreError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_rejects_empty() {
        assert!(matches!(
            require_text("username", ""),
            Err(StoreError::MissingField("username"))
        ));
        assert!(require_text("username", "alice").is_ok());
    }

    #[test]
    fn require_text_opt_allows_absent_but_not_empty() {
        assert!(require_text_opt("genre", None).is_ok());
        assert!(require_text_opt("genre", Some("SciFi")).is_ok());
        assert!(matches!(
            require_text_opt("genre", Some("")),
            Err(StoreError::MissingField("genre"))
        ));
    }
}
