//! Author CRUD operations.

use rusqlite::Connection;
use shelf_core::{AuthorId, Error, Result};

use super::{optional, write_error};
use crate::models::{Author, AuthorListing};

const COLS: &str = "id, name, about, slug";

/// Insert or update an author, keyed on its ID.
pub fn save_author(conn: &Connection, author: &Author) -> Result<()> {
    conn.execute(
        "INSERT INTO authors (id, name, about, slug) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name, about = excluded.about, slug = excluded.slug",
        rusqlite::params![author.id.to_string(), &author.name, &author.about, &author.slug],
    )
    .map_err(|e| write_error("author", &author.name, e))?;
    Ok(())
}

/// Get an author by primary key.
pub fn get_author(conn: &Connection, id: AuthorId) -> Result<Option<Author>> {
    let q = format!("SELECT {COLS} FROM authors WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Author::from_row))
}

/// Get an author by slug.
pub fn get_author_by_slug(conn: &Connection, slug: &str) -> Result<Option<Author>> {
    let q = format!("SELECT {COLS} FROM authors WHERE slug = ?1");
    optional(conn.query_row(&q, [slug], Author::from_row))
}

/// List authors with their book counts, ordered by name.
pub fn list_authors(conn: &Connection) -> Result<Vec<AuthorListing>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.id, a.name, a.about, a.slug,
                    (SELECT COUNT(*) FROM books b WHERE b.author_id = a.id)
             FROM authors a ORDER BY a.name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], AuthorListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Number of books written by an author.
pub fn count_books(conn: &Connection, id: AuthorId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM books WHERE author_id = ?1",
        [id.to_string()],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Delete an author by ID. Their books go with them via `ON DELETE CASCADE`.
pub fn delete_author(conn: &Connection, id: AuthorId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM authors WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
