//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rusqlite::Connection;
use shelf_core::{Error, Result};

/// V1: initial schema -- catalog tables, the book/tag join table, and polls.
const V1_INITIAL: &str = r#"
CREATE TABLE authors (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE,
    about TEXT NOT NULL DEFAULT '',
    slug  TEXT NOT NULL UNIQUE
);

CREATE TABLE publishers (
    id             TEXT PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE,
    establish_date TEXT,
    about          TEXT NOT NULL DEFAULT '',
    slug           TEXT NOT NULL UNIQUE
);

CREATE TABLE tags (
    id   TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE books (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    pub_date     TEXT,
    slug         TEXT NOT NULL UNIQUE,
    intro        TEXT NOT NULL DEFAULT '',
    cover        TEXT NOT NULL DEFAULT 'book_cover/default.jpg',
    publisher_id TEXT REFERENCES publishers(id) ON DELETE CASCADE,
    author_id    TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    UNIQUE (name, author_id)
);

CREATE TABLE book_tags (
    book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    tag_id  TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, tag_id)
);

CREATE TABLE polls (
    id      TEXT PRIMARY KEY,
    up      INTEGER NOT NULL DEFAULT 0,
    down    INTEGER NOT NULL DEFAULT 0,
    book_id TEXT NOT NULL UNIQUE REFERENCES books(id) ON DELETE CASCADE
);
"#;

/// V2: homepage carousel slides.
const V2_CAROUSELS: &str = r#"
CREATE TABLE carousels (
    id    TEXT PRIMARY KEY,
    img   TEXT NOT NULL,
    name  TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    intro TEXT NOT NULL DEFAULT '',
    link  TEXT NOT NULL DEFAULT ''
);
"#;

/// V3: indexes backing the admin list filters.
const V3_LIST_INDEXES: &str = r#"
CREATE INDEX idx_books_pub_date  ON books(pub_date);
CREATE INDEX idx_books_author    ON books(author_id);
CREATE INDEX idx_books_publisher ON books(publisher_id);
CREATE INDEX idx_book_tags_tag   ON book_tags(tag_id);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[
    (1, V1_INITIAL),
    (2, V2_CAROUSELS),
    (3, V3_LIST_INDEXES),
];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit()
            .map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(version, "applied migration");
    }

    Ok(())
}

/// Highest migration version known to this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|&(v, _)| v).unwrap_or(0)
}

/// Highest migration version recorded in `conn`, or 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<i64> {
    let has_table: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| Error::database(e.to_string()))?;
    if !has_table {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}
