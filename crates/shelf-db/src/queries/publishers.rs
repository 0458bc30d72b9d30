//! Publisher CRUD operations.

use rusqlite::Connection;
use shelf_core::{Error, PublisherId, Result};

use super::{optional, write_error};
use crate::models::{Publisher, PublisherListing};

const COLS: &str = "id, name, establish_date, about, slug";

/// Insert or update a publisher, keyed on its ID.
pub fn save_publisher(conn: &Connection, publisher: &Publisher) -> Result<()> {
    conn.execute(
        "INSERT INTO publishers (id, name, establish_date, about, slug)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             establish_date = excluded.establish_date,
             about = excluded.about,
             slug = excluded.slug",
        rusqlite::params![
            publisher.id.to_string(),
            &publisher.name,
            publisher.establish_date,
            &publisher.about,
            &publisher.slug,
        ],
    )
    .map_err(|e| write_error("publisher", &publisher.name, e))?;
    Ok(())
}

/// Get a publisher by primary key.
pub fn get_publisher(conn: &Connection, id: PublisherId) -> Result<Option<Publisher>> {
    let q = format!("SELECT {COLS} FROM publishers WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Publisher::from_row))
}

/// Get a publisher by slug.
pub fn get_publisher_by_slug(conn: &Connection, slug: &str) -> Result<Option<Publisher>> {
    let q = format!("SELECT {COLS} FROM publishers WHERE slug = ?1");
    optional(conn.query_row(&q, [slug], Publisher::from_row))
}

/// List publishers with book counts, ordered by name.
///
/// `established_in` restricts the list to publishers founded in that year.
pub fn list_publishers(
    conn: &Connection,
    established_in: Option<i32>,
) -> Result<Vec<PublisherListing>> {
    let year = established_in.map(|y| format!("{y:04}"));
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.name, p.establish_date, p.about, p.slug,
                    (SELECT COUNT(*) FROM books b WHERE b.publisher_id = p.id)
             FROM publishers p
             WHERE ?1 IS NULL OR strftime('%Y', p.establish_date) = ?1
             ORDER BY p.name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([year], PublisherListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a publisher by ID. Books that reference it cascade.
pub fn delete_publisher(conn: &Connection, id: PublisherId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM publishers WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
