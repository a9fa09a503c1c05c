//! End-to-end checks through a pooled connection, the way a front end would
//! drive the store.

use libris_db::{create_pool, run_migrations, PoolSettings};
use libris_store::{
    add_book, add_user, close_rental, create_rental, delete_book, get_all_books,
    rented_titles_by_user, StoreError,
};

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().expect("valid date literal")
}

#[test]
fn full_lending_flow_through_the_pool() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("library.db");
    let pool =
        create_pool(path.to_str().unwrap(), PoolSettings::default()).expect("pool creation failed");
    let conn = pool.get().expect("failed to get connection");
    run_migrations(&conn).expect("migrations failed");

    let alice = add_user(&conn, "alice", "secret").expect("add_user failed");
    let dune = add_book(&conn, "Dune", "Herbert", Some(1965), Some("SciFi")).expect("add_book failed");
    let emma = add_book(&conn, "Emma", "Austen", Some(1815), None).expect("add_book failed");

    let books = get_all_books(&conn).expect("get_all_books failed");
    assert_eq!(books.len(), 2);

    let rental = create_rental(&conn, dune, alice, date("2024-01-01")).expect("rental failed");
    assert_eq!(
        rented_titles_by_user(&conn, alice).expect("query failed"),
        vec!["Dune"]
    );

    // Pooled connections have foreign keys on, so the rented book cannot go.
    let err = delete_book(&conn, dune).expect_err("delete of rented book should fail");
    assert!(err.is_constraint_violation(), "got: {err:?}");

    close_rental(&conn, rental, date("2024-01-20")).expect("close failed");
    assert!(rented_titles_by_user(&conn, alice).expect("query failed").is_empty());

    // An untouched book deletes fine.
    delete_book(&conn, emma).expect("delete failed");
    assert_eq!(get_all_books(&conn).expect("get_all_books failed").len(), 1);
}

#[test]
fn rejected_input_leaves_every_table_unchanged() {
    let pool = create_pool(":memory:", PoolSettings::default()).expect("pool creation failed");
    let conn = pool.get().expect("failed to get connection");
    run_migrations(&conn).expect("migrations failed");

    add_user(&conn, "alice", "secret").expect("add_user failed");
    add_book(&conn, "Dune", "Herbert", Some(1965), Some("SciFi")).expect("add_book failed");

    let counts = |conn: &rusqlite::Connection| -> Vec<i64> {
        ["users", "authors", "genres", "books", "rentals"]
            .iter()
            .map(|t| {
                conn.query_row(&format!("SELECT COUNT(*) FROM {t}"), [], |r| r.get(0))
                    .expect("count query failed")
            })
            .collect()
    };
    let before = counts(&conn);

    assert!(matches!(
        add_user(&conn, "", "pw"),
        Err(StoreError::MissingField("username"))
    ));
    assert!(matches!(
        add_book(&conn, "", "Herbert", None, None),
        Err(StoreError::MissingField("title"))
    ));
    assert!(matches!(
        add_book(&conn, "Dune II", "", None, None),
        Err(StoreError::MissingField("author"))
    ));

    assert_eq!(counts(&conn), before);
}
