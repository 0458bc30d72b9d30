//! The catalog: hook chains wired to a connection pool.

use std::sync::Arc;

use shelf_core::config::ImageConfig;
use shelf_core::{AuthorId, BookId, CarouselId, Error, PublisherId, Result, TagId};
use shelf_db::models::{Author, Book, Carousel, Poll, Publisher, Tag};
use shelf_db::pool::{get_conn, DbPool, PooledConnection};
use shelf_db::queries::{authors, books, carousels, polls, publishers, tags};

use super::hooks::{BookSlugHook, HookChain, PollProvisioner, SlugHook};
use crate::media::{ImageStore, MediaLifecycleManager};

/// Direction of a poll vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

/// Write entry point for every catalog record.
///
/// Reads go straight to [`shelf_db::queries`] through [`Catalog::conn`];
/// saves and deletes go through the hook chain registered for the record type.
pub struct Catalog {
    pool: DbPool,
    authors: HookChain<Author>,
    publishers: HookChain<Publisher>,
    tags: HookChain<Tag>,
    books: HookChain<Book>,
    carousels: HookChain<Carousel>,
}

impl Catalog {
    pub fn new(pool: DbPool, store: Arc<dyn ImageStore>, images: ImageConfig) -> Self {
        let media = Arc::new(MediaLifecycleManager::new(store, images));
        let slug = Arc::new(SlugHook);

        Self {
            pool,
            authors: HookChain::<Author>::new().with(slug.clone()),
            publishers: HookChain::<Publisher>::new().with(slug.clone()),
            tags: HookChain::<Tag>::new().with(slug),
            books: HookChain::<Book>::new()
                .with(Arc::new(BookSlugHook))
                .with(Arc::new(PollProvisioner))
                .with(media.clone()),
            carousels: HookChain::<Carousel>::new().with(media),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn conn(&self) -> Result<PooledConnection> {
        get_conn(&self.pool)
    }

    // -- authors ------------------------------------------------------------

    pub fn save_author(&self, author: &mut Author) -> Result<()> {
        let conn = self.conn()?;
        self.authors.save(&conn, author)
    }

    /// Delete an author and every book they wrote.
    ///
    /// Books go through their own delete hooks first so their cover files are
    /// removed; the first failure stops the cascade.
    pub fn delete_author(&self, id: AuthorId) -> Result<()> {
        let conn = self.conn()?;
        let author = authors::get_author(&conn, id)?.ok_or_else(|| Error::not_found("author", id))?;

        for book in books::list_books_by_author(&conn, id)? {
            self.books.delete(&conn, &book)?;
        }
        self.authors.delete(&conn, &author)?;
        tracing::info!(author = %id, "deleted {author}");
        Ok(())
    }

    // -- publishers ---------------------------------------------------------

    pub fn save_publisher(&self, publisher: &mut Publisher) -> Result<()> {
        let conn = self.conn()?;
        self.publishers.save(&conn, publisher)
    }

    /// Delete a publisher and every book it published, cover files included.
    pub fn delete_publisher(&self, id: PublisherId) -> Result<()> {
        let conn = self.conn()?;
        let publisher =
            publishers::get_publisher(&conn, id)?.ok_or_else(|| Error::not_found("publisher", id))?;

        for book in books::list_books_by_publisher(&conn, id)? {
            self.books.delete(&conn, &book)?;
        }
        self.publishers.delete(&conn, &publisher)?;
        tracing::info!(publisher = %id, "deleted {publisher}");
        Ok(())
    }

    // -- tags ---------------------------------------------------------------

    pub fn save_tag(&self, tag: &mut Tag) -> Result<()> {
        let conn = self.conn()?;
        self.tags.save(&conn, tag)
    }

    pub fn delete_tag(&self, id: TagId) -> Result<()> {
        let conn = self.conn()?;
        let tag = tags::get_tag(&conn, id)?.ok_or_else(|| Error::not_found("tag", id))?;
        self.tags.delete(&conn, &tag)?;
        Ok(())
    }

    // -- books --------------------------------------------------------------

    /// Save a book: slug, poll, then cover replacement and crop.
    pub fn save_book(&self, book: &mut Book) -> Result<()> {
        let conn = self.conn()?;
        self.books.save(&conn, book)?;
        tracing::info!(book = %book.id, slug = %book.slug, "saved {book}");
        Ok(())
    }

    pub fn delete_book(&self, id: BookId) -> Result<()> {
        let conn = self.conn()?;
        let book = books::get_book(&conn, id)?.ok_or_else(|| Error::not_found("book", id))?;
        self.books.delete(&conn, &book)?;
        tracing::info!(book = %id, "deleted {book}");
        Ok(())
    }

    /// Replace the full tag set of a book.
    pub fn set_book_tags(&self, id: BookId, tag_ids: &[TagId]) -> Result<()> {
        let conn = self.conn()?;
        if books::get_book(&conn, id)?.is_none() {
            return Err(Error::not_found("book", id));
        }
        books::set_book_tags(&conn, id, tag_ids)
    }

    pub fn vote(&self, id: BookId, vote: Vote) -> Result<Poll> {
        let conn = self.conn()?;
        match vote {
            Vote::Up => polls::vote_up(&conn, id),
            Vote::Down => polls::vote_down(&conn, id),
        }
    }

    // -- carousels ----------------------------------------------------------

    pub fn save_carousel(&self, slide: &mut Carousel) -> Result<()> {
        let conn = self.conn()?;
        self.carousels.save(&conn, slide)
    }

    pub fn delete_carousel(&self, id: CarouselId) -> Result<()> {
        let conn = self.conn()?;
        let slide =
            carousels::get_carousel(&conn, id)?.ok_or_else(|| Error::not_found("carousel", id))?;
        self.carousels.delete(&conn, &slide)?;
        Ok(())
    }
}
