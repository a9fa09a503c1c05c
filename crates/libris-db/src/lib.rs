//! Database layer for the Libris persistence workspace.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. Every table in Libris is created through
//! versioned migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a single store file, no external database
//!   process. WAL allows concurrent readers with a single writer, which
//!   covers a library front end reading the catalog while rentals are
//!   written.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the code that depends on it
//!   and bootstrapping is idempotent.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, PoolError, PoolSettings};
