//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Listing types carry the derived read-only fields the
//! admin views display (book counts, poll differential).

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shelf_core::{AuthorId, BookId, CarouselId, ImageRef, PollId, PublisherId, TagId};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Parse a UUID-based ID from a text column.
pub(crate) fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))?;
    Ok(T::from(uuid))
}

pub(crate) fn parse_opt_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => {
            let uuid = Uuid::parse_str(&v)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))?;
            Ok(Some(T::from(uuid)))
        }
        None => Ok(None),
    }
}

fn parse_image(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<ImageRef> {
    let s: String = row.get(idx)?;
    Ok(ImageRef::new(s))
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub about: String,
    pub slug: String,
}

impl Author {
    /// New unsaved author. The slug is filled in when the record is saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AuthorId::new(),
            name: name.into(),
            about: String::new(),
            slug: String::new(),
        }
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            about: row.get(2)?,
            slug: row.get(3)?,
        })
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Author({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub establish_date: Option<NaiveDate>,
    pub about: String,
    pub slug: String,
}

impl Publisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PublisherId::new(),
            name: name.into(),
            establish_date: None,
            about: String::new(),
            slug: String::new(),
        }
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            establish_date: row.get(2)?,
            about: row.get(3)?,
            slug: row.get(4)?,
        })
    }
}

impl fmt::Display for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Publisher({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            slug: String::new(),
        }
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Book
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub pub_date: Option<NaiveDate>,
    pub slug: String,
    pub intro: String,
    pub cover: ImageRef,
    pub publisher_id: Option<PublisherId>,
    pub author_id: AuthorId,
}

impl Book {
    /// New unsaved book with today's publication date and the placeholder cover.
    pub fn new(name: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            id: BookId::new(),
            name: name.into(),
            pub_date: Some(Utc::now().date_naive()),
            slug: String::new(),
            intro: String::new(),
            cover: ImageRef::default_cover(),
            publisher_id: None,
            author_id,
        }
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            pub_date: row.get(2)?,
            slug: row.get(3)?,
            intro: row.get(4)?,
            cover: parse_image(row, 5)?,
            publisher_id: parse_opt_id(row, 6)?,
            author_id: parse_id(row, 7)?,
        })
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poll {
    pub id: PollId,
    pub up: i64,
    pub down: i64,
    pub book_id: BookId,
}

impl Poll {
    pub fn new(book_id: BookId) -> Self {
        Self {
            id: PollId::new(),
            up: 0,
            down: 0,
            book_id,
        }
    }

    /// Up votes minus down votes.
    pub fn score(&self) -> i64 {
        self.up - self.down
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            up: row.get(1)?,
            down: row.get(2)?,
            book_id: parse_id(row, 3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Carousel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carousel {
    pub id: CarouselId,
    pub img: ImageRef,
    pub name: String,
    pub title: String,
    pub intro: String,
    pub link: String,
}

impl Carousel {
    pub fn new(img: ImageRef) -> Self {
        Self {
            id: CarouselId::new(),
            img,
            name: String::new(),
            title: String::new(),
            intro: String::new(),
            link: String::new(),
        }
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            img: parse_image(row, 1)?,
            name: row.get(2)?,
            title: row.get(3)?,
            intro: row.get(4)?,
            link: row.get(5)?,
        })
    }
}

impl fmt::Display for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Carousel(name:{}, dir={})", self.name, self.img)
    }
}

// ---------------------------------------------------------------------------
// Admin listings
// ---------------------------------------------------------------------------

/// A book row as the admin list shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListing {
    #[serde(flatten)]
    pub book: Book,
    pub author_name: String,
    pub publisher_name: Option<String>,
    pub poll_up: i64,
    pub poll_down: i64,
}

impl BookListing {
    /// Poll differential (up - down). Zero when the book has no poll yet.
    pub fn poll_count(&self) -> i64 {
        self.poll_up - self.poll_down
    }

    /// Expects the book columns followed by author name, publisher name, up, down.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            book: Book::from_row(row)?,
            author_name: row.get(8)?,
            publisher_name: row.get(9)?,
            poll_up: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
            poll_down: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorListing {
    #[serde(flatten)]
    pub author: Author,
    pub book_count: i64,
}

impl AuthorListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            author: Author::from_row(row)?,
            book_count: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherListing {
    #[serde(flatten)]
    pub publisher: Publisher,
    pub book_count: i64,
}

impl PublisherListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            publisher: Publisher::from_row(row)?,
            book_count: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagListing {
    #[serde(flatten)]
    pub tag: Tag,
    pub book_count: i64,
}

impl TagListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            tag: Tag::from_row(row)?,
            book_count: row.get(3)?,
        })
    }
}

/// A poll together with the name of the book it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollListing {
    #[serde(flatten)]
    pub poll: Poll,
    pub book_name: String,
}

impl PollListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            poll: Poll::from_row(row)?,
            book_name: row.get(4)?,
        })
    }
}

impl fmt::Display for PollListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Poll(book:{}, up:{}, down:{})",
            self.book_name, self.poll.up, self.poll.down
        )
    }
}
