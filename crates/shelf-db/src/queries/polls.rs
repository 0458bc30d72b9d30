//! Poll operations: creation, lookup, and voting.

use rusqlite::Connection;
use shelf_core::{BookId, Error, Result};

use super::{optional, write_error};
use crate::models::{Poll, PollListing};

const COLS: &str = "id, up, down, book_id";

/// Create an empty (0/0) poll for a book.
///
/// A book has at most one poll; creating a second is [`Error::Conflict`].
pub fn create_poll(conn: &Connection, book_id: BookId) -> Result<Poll> {
    let poll = Poll::new(book_id);
    conn.execute(
        "INSERT INTO polls (id, up, down, book_id) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![poll.id.to_string(), poll.up, poll.down, book_id.to_string()],
    )
    .map_err(|e| write_error("poll", &book_id.to_string(), e))?;
    Ok(poll)
}

/// Get the poll belonging to a book.
pub fn get_poll_for_book(conn: &Connection, book_id: BookId) -> Result<Option<Poll>> {
    let q = format!("SELECT {COLS} FROM polls WHERE book_id = ?1");
    optional(conn.query_row(&q, [book_id.to_string()], Poll::from_row))
}

/// Record an up vote and return the updated poll.
pub fn vote_up(conn: &Connection, book_id: BookId) -> Result<Poll> {
    vote(conn, book_id, "UPDATE polls SET up = up + 1 WHERE book_id = ?1")
}

/// Record a down vote and return the updated poll.
pub fn vote_down(conn: &Connection, book_id: BookId) -> Result<Poll> {
    vote(conn, book_id, "UPDATE polls SET down = down + 1 WHERE book_id = ?1")
}

fn vote(conn: &Connection, book_id: BookId, sql: &str) -> Result<Poll> {
    let n = conn
        .execute(sql, [book_id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Err(Error::not_found("poll", book_id));
    }
    get_poll_for_book(conn, book_id)?.ok_or_else(|| Error::not_found("poll", book_id))
}

/// List every poll with its book's name, ordered by book name.
pub fn list_polls(conn: &Connection) -> Result<Vec<PollListing>> {
    let mut stmt = conn
        .prepare(
            "SELECT pl.id, pl.up, pl.down, pl.book_id, b.name
             FROM polls pl JOIN books b ON b.id = pl.book_id
             ORDER BY b.name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], PollListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
