//! Book CRUD operations, tag links, and the filtered admin listing.

use rusqlite::types::ToSql;
use rusqlite::Connection;
use shelf_core::{AuthorId, BookId, Error, PublisherId, Result, TagId};

use super::{optional, write_error};
use crate::models::{Book, BookListing};

const COLS: &str = "id, name, pub_date, slug, intro, cover, publisher_id, author_id";

/// Filters for [`list_books`]. Unset fields do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author: Option<AuthorId>,
    pub publisher: Option<PublisherId>,
    pub tag: Option<TagId>,
    /// Case-insensitive substring match on the book name.
    pub search: Option<String>,
    pub year: Option<i32>,
    /// Only meaningful together with `year`.
    pub month: Option<u32>,
}

/// Insert or update a book, keyed on its ID.
pub fn save_book(conn: &Connection, book: &Book) -> Result<()> {
    conn.execute(
        "INSERT INTO books (id, name, pub_date, slug, intro, cover, publisher_id, author_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             pub_date = excluded.pub_date,
             slug = excluded.slug,
             intro = excluded.intro,
             cover = excluded.cover,
             publisher_id = excluded.publisher_id,
             author_id = excluded.author_id",
        rusqlite::params![
            book.id.to_string(),
            &book.name,
            book.pub_date,
            &book.slug,
            &book.intro,
            book.cover.as_str(),
            book.publisher_id.map(|id| id.to_string()),
            book.author_id.to_string(),
        ],
    )
    .map_err(|e| write_error("book", &book.name, e))?;
    Ok(())
}

/// Get a book by primary key.
pub fn get_book(conn: &Connection, id: BookId) -> Result<Option<Book>> {
    let q = format!("SELECT {COLS} FROM books WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Book::from_row))
}

/// Get a book by slug.
pub fn get_book_by_slug(conn: &Connection, slug: &str) -> Result<Option<Book>> {
    let q = format!("SELECT {COLS} FROM books WHERE slug = ?1");
    optional(conn.query_row(&q, [slug], Book::from_row))
}

/// All books by an author, ordered by publication date.
pub fn list_books_by_author(conn: &Connection, author_id: AuthorId) -> Result<Vec<Book>> {
    let q = format!("SELECT {COLS} FROM books WHERE author_id = ?1 ORDER BY pub_date, name");
    query_books(conn, &q, &author_id.to_string())
}

/// All books from a publisher, ordered by publication date.
pub fn list_books_by_publisher(conn: &Connection, publisher_id: PublisherId) -> Result<Vec<Book>> {
    let q = format!("SELECT {COLS} FROM books WHERE publisher_id = ?1 ORDER BY pub_date, name");
    query_books(conn, &q, &publisher_id.to_string())
}

fn query_books(conn: &Connection, q: &str, param: &str) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare(q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([param], Book::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// List books with author, publisher and poll columns, ordered by publication date.
pub fn list_books(conn: &Connection, filter: &BookFilter) -> Result<Vec<BookListing>> {
    let mut sql = String::from(
        "SELECT b.id, b.name, b.pub_date, b.slug, b.intro, b.cover, b.publisher_id, b.author_id,
                a.name, p.name, pl.up, pl.down
         FROM books b
         JOIN authors a ON a.id = b.author_id
         LEFT JOIN publishers p ON p.id = b.publisher_id
         LEFT JOIN polls pl ON pl.book_id = b.id
         WHERE 1 = 1",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(author) = filter.author {
        params.push(Box::new(author.to_string()));
        sql.push_str(&format!(" AND b.author_id = ?{}", params.len()));
    }
    if let Some(publisher) = filter.publisher {
        params.push(Box::new(publisher.to_string()));
        sql.push_str(&format!(" AND b.publisher_id = ?{}", params.len()));
    }
    if let Some(tag) = filter.tag {
        params.push(Box::new(tag.to_string()));
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM book_tags bt WHERE bt.book_id = b.id AND bt.tag_id = ?{})",
            params.len()
        ));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        params.push(Box::new(format!("%{}%", escape_like(search))));
        sql.push_str(&format!(" AND b.name LIKE ?{} ESCAPE '\\'", params.len()));
    }
    if let Some(year) = filter.year {
        params.push(Box::new(format!("{year:04}")));
        sql.push_str(&format!(" AND strftime('%Y', b.pub_date) = ?{}", params.len()));
        if let Some(month) = filter.month {
            params.push(Box::new(format!("{month:02}")));
            sql.push_str(&format!(" AND strftime('%m', b.pub_date) = ?{}", params.len()));
        }
    }
    sql.push_str(" ORDER BY b.pub_date ASC, b.name ASC");

    let mut stmt = conn.prepare(&sql).map_err(|e| Error::database(e.to_string()))?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), BookListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Replace the set of tags attached to a book.
pub fn set_book_tags(conn: &Connection, book_id: BookId, tags: &[TagId]) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute("DELETE FROM book_tags WHERE book_id = ?1", [book_id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;

    for tag in tags {
        tx.execute(
            "INSERT OR IGNORE INTO book_tags (book_id, tag_id) VALUES (?1, ?2)",
            rusqlite::params![book_id.to_string(), tag.to_string()],
        )
        .map_err(|e| write_error("book tag", &tag.to_string(), e))?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))
}

/// Delete a book by ID. Its poll and tag links are removed by cascade.
pub fn delete_book(conn: &Connection, id: BookId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM books WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
