//! Embedded SQL migration runner.
//!
//! Migrations are SQL files embedded at compile time and run sequentially on
//! startup, tracked by the `_libris_migrations` table. Each migration runs
//! exactly once; applied migrations are skipped, so bootstrapping the schema
//! on every startup is idempotent.

use rusqlite::Connection;
use thiserror::Error;

/// A single embedded migration.
struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. New migrations are appended here.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_users",
        sql: include_str!("migrations/000_users.sql"),
    },
    Migration {
        name: "001_catalog",
        sql: include_str!("migrations/001_catalog.sql"),
    },
    Migration {
        name: "002_books",
        sql: include_str!("migrations/002_books.sql"),
    },
    Migration {
        name: "003_rentals",
        sql: include_str!("migrations/003_rentals.sql"),
    },
];

/// Errors that can occur during migration execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A SQL statement within a migration failed.
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the migration that failed.
        name: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// Failed to query migration state.
    #[error("failed to check migration state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Runs all pending migrations against the given connection.
///
/// Returns the number of migrations applied this run. Each migration executes
/// inside its own transaction together with its tracking-table insert, so a
/// failed migration leaves no partial schema behind.
///
/// # Errors
///
/// Returns [`MigrationError`] if any migration fails to execute or if the
/// migration tracking table cannot be queried.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    run_migrations_from_list(conn, MIGRATIONS)
}

fn run_migrations_from_list(
    conn: &Connection,
    migrations: &[Migration],
) -> Result<usize, MigrationError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _libris_migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| MigrationError::ExecutionFailed {
        name: "_libris_migrations_bootstrap".to_string(),
        source: e,
    })?;

    let mut applied = 0;

    for migration in migrations {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _libris_migrations WHERE name = ?1",
                [migration.name],
                |row| row.get(0),
            )
            .map_err(MigrationError::StateQuery)?;

        if already_applied {
            tracing::debug!(
                migration = migration.name,
                "migration already applied, skipping"
            );
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| MigrationError::ExecutionFailed {
                name: migration.name.to_string(),
                source: e,
            })?;

        tx.execute_batch(migration.sql)
            .map_err(|e| MigrationError::ExecutionFailed {
                name: migration.name.to_string(),
                source: e,
            })?;

        tx.execute(
            "INSERT INTO _libris_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(|e| MigrationError::ExecutionFailed {
            name: migration.name.to_string(),
            source: e,
        })?;

        tx.commit().map_err(|e| MigrationError::ExecutionFailed {
            name: migration.name.to_string(),
            source: e,
        })?;

        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn run_migrations_on_fresh_db() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let applied = run_migrations(&conn).expect("migrations should succeed");
        assert_eq!(applied, 4, "should apply all migrations");

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM _libris_migrations", [], |row| {
                row.get(0)
            })
            .expect("should query migration count");
        assert_eq!(count, 4);
    }

    #[test]
    fn run_migrations_idempotent() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");

        let first = run_migrations(&conn).expect("first run should succeed");
        assert_eq!(first, 4);

        let second = run_migrations(&conn).expect("second run should succeed");
        assert_eq!(second, 0, "no new migrations to apply");
    }

    #[test]
    fn all_five_tables_exist() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        for table in ["users", "authors", "genres", "books", "rentals"] {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                    [table],
                    |row| row.get(0),
                )
                .expect("should query sqlite_master");
            assert!(exists, "table {table} should exist");
        }
    }

    #[test]
    fn failed_migration_leaves_no_partial_schema() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");

        // A hypothetical follow-up migration that creates a table and then
        // seeds it with rows violating its own uniqueness constraint: the
        // batch fails halfway, and the table created by the first statement
        // must not survive, nor may the migration be recorded as applied.
        let migrations = [Migration {
            name: "004_overdue_notices",
            sql: "
                CREATE TABLE overdue_notices (
                    notice_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    rental_id INTEGER NOT NULL UNIQUE
                );
                INSERT INTO overdue_notices (rental_id) VALUES (1);
                INSERT INTO overdue_notices (rental_id) VALUES (1);
            ",
        }];

        let err = run_migrations_from_list(&conn, &migrations)
            .expect_err("duplicate seed rows should fail the migration");

        match err {
            MigrationError::ExecutionFailed { name, .. } => {
                assert_eq!(name, "004_overdue_notices")
            }
            other => panic!("unexpected error type: {other:?}"),
        }

        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'overdue_notices')",
                [],
                |row| row.get(0),
            )
            .expect("should query sqlite_master");
        assert!(
            !table_exists,
            "partially-applied migration should roll back its schema changes"
        );

        let recorded: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _libris_migrations WHERE name = '004_overdue_notices'",
                [],
                |row| row.get(0),
            )
            .expect("should query tracking table");
        assert!(!recorded, "failed migration must not be recorded as applied");
    }
}
