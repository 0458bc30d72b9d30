//! Hook trait, hook chain, and the slug and poll hooks.

use std::sync::Arc;

use rusqlite::Connection;
use shelf_core::slug;
use shelf_core::{Error, Result};
use shelf_db::models::Book;
use shelf_db::queries::{authors, polls};

use super::record::{Record, Slugged};

/// Side effects attached to saving or deleting a record of type `R`.
///
/// Every stage defaults to a no-op. `pre_save` may modify the record before
/// it is written; the later stages only observe it.
pub trait RecordHooks<R>: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn pre_save(&self, _conn: &Connection, _record: &mut R) -> Result<()> {
        Ok(())
    }

    fn post_save(&self, _conn: &Connection, _record: &R) -> Result<()> {
        Ok(())
    }

    fn pre_delete(&self, _conn: &Connection, _record: &R) -> Result<()> {
        Ok(())
    }

    fn post_delete(&self, _conn: &Connection, _record: &R) -> Result<()> {
        Ok(())
    }
}

/// Ordered hooks wrapped around a record's persistence calls.
pub struct HookChain<R> {
    hooks: Vec<Arc<dyn RecordHooks<R>>>,
}

impl<R> Default for HookChain<R> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<R: Record> HookChain<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn with(mut self, hook: Arc<dyn RecordHooks<R>>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Validate, run pre-save hooks, write, run post-save hooks.
    ///
    /// Everything after validation runs in one transaction, so a failing
    /// hook leaves the stored row as it was. File work already done by a
    /// hook is not undone.
    pub fn save(&self, conn: &Connection, record: &mut R) -> Result<()> {
        record.validate()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        for hook in &self.hooks {
            tracing::trace!(entity = R::ENTITY, hook = hook.name(), "pre_save");
            hook.pre_save(&tx, record)?;
        }

        record.write(&tx)?;
        tracing::debug!(entity = R::ENTITY, id = %record.key(), "saved {record}");

        for hook in &self.hooks {
            tracing::trace!(entity = R::ENTITY, hook = hook.name(), "post_save");
            hook.post_save(&tx, record)?;
        }

        tx.commit().map_err(|e| Error::database(e.to_string()))
    }

    /// Run pre-delete hooks, delete, run post-delete hooks, in one transaction.
    ///
    /// Returns whether a row was removed.
    pub fn delete(&self, conn: &Connection, record: &R) -> Result<bool> {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        for hook in &self.hooks {
            tracing::trace!(entity = R::ENTITY, hook = hook.name(), "pre_delete");
            hook.pre_delete(&tx, record)?;
        }

        let removed = record.remove(&tx)?;
        tracing::debug!(entity = R::ENTITY, id = %record.key(), removed, "deleted {record}");

        for hook in &self.hooks {
            tracing::trace!(entity = R::ENTITY, hook = hook.name(), "post_delete");
            hook.post_delete(&tx, record)?;
        }

        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Recomputes the slug of an author, publisher or tag from its name.
pub struct SlugHook;

impl<R: Slugged> RecordHooks<R> for SlugHook {
    fn name(&self) -> &'static str {
        "slug"
    }

    fn pre_save(&self, _conn: &Connection, record: &mut R) -> Result<()> {
        let slug = slug::name_slug(record.slug_source());
        if slug.is_empty() {
            return Err(Error::validation(format!(
                "{} name '{}' has no letters or digits to build a slug from",
                R::ENTITY,
                record.slug_source()
            )));
        }
        record.set_slug(slug);
        Ok(())
    }
}

/// Recomputes a book's slug from its name and its author's name.
pub struct BookSlugHook;

impl RecordHooks<Book> for BookSlugHook {
    fn name(&self) -> &'static str {
        "book-slug"
    }

    fn pre_save(&self, conn: &Connection, book: &mut Book) -> Result<()> {
        let author = authors::get_author(conn, book.author_id)?.ok_or_else(|| {
            Error::validation(format!("book '{}' references a missing author", book.name))
        })?;

        let slug = slug::book_slug(&book.name, &author.name);
        if slug.is_empty() {
            return Err(Error::validation(format!(
                "book '{}' has no letters or digits to build a slug from",
                book.name
            )));
        }
        book.slug = slug;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Polls
// ---------------------------------------------------------------------------

/// Gives every saved book a 0/0 poll if it has none.
pub struct PollProvisioner;

impl RecordHooks<Book> for PollProvisioner {
    fn name(&self) -> &'static str {
        "poll"
    }

    fn post_save(&self, conn: &Connection, book: &Book) -> Result<()> {
        if polls::get_poll_for_book(conn, book.id)?.is_none() {
            let poll = polls::create_poll(conn, book.id)?;
            tracing::debug!(book = %book.id, poll = %poll.id, "created poll");
        }
        Ok(())
    }
}
