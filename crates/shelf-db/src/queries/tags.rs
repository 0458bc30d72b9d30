//! Tag CRUD operations.

use rusqlite::Connection;
use shelf_core::{BookId, Error, Result, TagId};

use super::{optional, write_error};
use crate::models::{Tag, TagListing};

const COLS: &str = "id, name, slug";

/// Insert or update a tag, keyed on its ID.
pub fn save_tag(conn: &Connection, tag: &Tag) -> Result<()> {
    conn.execute(
        "INSERT INTO tags (id, name, slug) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, slug = excluded.slug",
        rusqlite::params![tag.id.to_string(), &tag.name, &tag.slug],
    )
    .map_err(|e| write_error("tag", &tag.name, e))?;
    Ok(())
}

/// Get a tag by primary key.
pub fn get_tag(conn: &Connection, id: TagId) -> Result<Option<Tag>> {
    let q = format!("SELECT {COLS} FROM tags WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Tag::from_row))
}

/// Get a tag by slug.
pub fn get_tag_by_slug(conn: &Connection, slug: &str) -> Result<Option<Tag>> {
    let q = format!("SELECT {COLS} FROM tags WHERE slug = ?1");
    optional(conn.query_row(&q, [slug], Tag::from_row))
}

/// List tags with the number of books carrying each, ordered by name.
pub fn list_tags(conn: &Connection) -> Result<Vec<TagListing>> {
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.name, t.slug,
                    (SELECT COUNT(*) FROM book_tags bt WHERE bt.tag_id = t.id)
             FROM tags t ORDER BY t.name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], TagListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Tags attached to a book, ordered by name.
pub fn list_tags_for_book(conn: &Connection, book_id: BookId) -> Result<Vec<Tag>> {
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.name, t.slug
             FROM tags t JOIN book_tags bt ON bt.tag_id = t.id
             WHERE bt.book_id = ?1
             ORDER BY t.name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([book_id.to_string()], Tag::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a tag by ID. Its links to books are removed by cascade.
pub fn delete_tag(conn: &Connection, id: TagId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM tags WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
