//! Persistence and field validation for each catalog record type.

use std::fmt;

use rusqlite::Connection;
use shelf_core::{Error, Result};
use shelf_db::models::{Author, Book, Carousel, Publisher, Tag};
use shelf_db::queries::{authors, books, carousels, publishers, tags};
use url::Url;

/// A record that a [`HookChain`](super::HookChain) can save and delete.
pub trait Record: fmt::Display {
    /// Entity name used in logs and error messages.
    const ENTITY: &'static str;

    /// Stable identifier, rendered for logs.
    fn key(&self) -> String;

    /// Check field constraints. Runs before any hook.
    fn validate(&self) -> Result<()>;

    /// Insert or update the row.
    fn write(&self, conn: &Connection) -> Result<()>;

    /// Delete the row. Returns whether a row existed.
    fn remove(&self, conn: &Connection) -> Result<bool>;
}

/// A record whose slug is derived from a single name field.
pub trait Slugged: Record {
    fn slug_source(&self) -> &str;
    fn set_slug(&mut self, slug: String);
}

const NAME_MAX: usize = 32;

fn require_name(entity: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation(format!("{entity} name must not be empty")));
    }
    max_len(entity, "name", name, NAME_MAX)
}

fn max_len(entity: &str, field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::validation(format!(
            "{entity} {field} is {len} characters; the limit is {max}"
        )));
    }
    Ok(())
}

fn check_link(link: &str) -> Result<()> {
    if link.is_empty() {
        return Ok(());
    }
    let url = Url::parse(link)
        .map_err(|e| Error::validation(format!("carousel link '{link}' is not a URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::validation(format!(
            "carousel link must be http or https, got '{other}'"
        ))),
    }
}

impl Record for Author {
    const ENTITY: &'static str = "author";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<()> {
        require_name(Self::ENTITY, &self.name)?;
        max_len(Self::ENTITY, "about", &self.about, 1280)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        authors::save_author(conn, self)
    }

    fn remove(&self, conn: &Connection) -> Result<bool> {
        authors::delete_author(conn, self.id)
    }
}

impl Slugged for Author {
    fn slug_source(&self) -> &str {
        &self.name
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}

impl Record for Publisher {
    const ENTITY: &'static str = "publisher";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<()> {
        require_name(Self::ENTITY, &self.name)?;
        max_len(Self::ENTITY, "about", &self.about, 1024)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        publishers::save_publisher(conn, self)
    }

    fn remove(&self, conn: &Connection) -> Result<bool> {
        publishers::delete_publisher(conn, self.id)
    }
}

impl Slugged for Publisher {
    fn slug_source(&self) -> &str {
        &self.name
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}

impl Record for Tag {
    const ENTITY: &'static str = "tag";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<()> {
        require_name(Self::ENTITY, &self.name)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        tags::save_tag(conn, self)
    }

    fn remove(&self, conn: &Connection) -> Result<bool> {
        tags::delete_tag(conn, self.id)
    }
}

impl Slugged for Tag {
    fn slug_source(&self) -> &str {
        &self.name
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}

impl Record for Book {
    const ENTITY: &'static str = "book";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<()> {
        require_name(Self::ENTITY, &self.name)?;
        max_len(Self::ENTITY, "intro", &self.intro, 1280)?;
        self.cover.check()
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        books::save_book(conn, self)
    }

    fn remove(&self, conn: &Connection) -> Result<bool> {
        books::delete_book(conn, self.id)
    }
}

impl Record for Carousel {
    const ENTITY: &'static str = "carousel";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn validate(&self) -> Result<()> {
        self.img.check()?;
        max_len(Self::ENTITY, "name", &self.name, NAME_MAX)?;
        max_len(Self::ENTITY, "title", &self.title, 128)?;
        max_len(Self::ENTITY, "intro", &self.intro, 128)?;
        check_link(&self.link)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        carousels::save_carousel(conn, self)
    }

    fn remove(&self, conn: &Connection) -> Result<bool> {
        carousels::delete_carousel(conn, self.id)
    }
}
