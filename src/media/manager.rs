//! Keeps image files in step with book covers and carousel slides.
//!
//! Book save:
//! - pre-save: when the new cover is not the placeholder and differs from the
//!   stored one, the stored cover is noted for removal. Nothing is touched yet.
//! - post-save: a non-placeholder cover is cropped to the configured cover
//!   size, then the noted cover file is removed. A file that is already gone
//!   is a no-op.
//!
//! Book delete (post-delete): a non-placeholder cover file is removed.
//!
//! Carousel save (post-save): the slide image is cropped to the carousel size.
//! Carousel delete (post-delete): the slide image is removed.
//!
//! The hooks run inside the catalog's transaction, so a failure here rolls
//! back the row change that triggered it. File changes are not undone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use shelf_core::config::ImageConfig;
use shelf_core::{BookId, Error, ImageRef, Result};
use shelf_db::models::{Book, Carousel};
use shelf_db::queries::books;

use super::store::{DeleteOutcome, ImageStore};
use crate::catalog::RecordHooks;

/// Lifecycle hooks for book covers and carousel images.
pub struct MediaLifecycleManager {
    store: Arc<dyn ImageStore>,
    images: ImageConfig,
    /// Covers replaced by a save in progress, keyed by book.
    replaced: Mutex<HashMap<BookId, ImageRef>>,
}

impl MediaLifecycleManager {
    /// Create a manager over `store` that crops to the sizes in `images`.
    pub fn new(store: Arc<dyn ImageStore>, images: ImageConfig) -> Self {
        Self {
            store,
            images,
            replaced: Mutex::new(HashMap::new()),
        }
    }

    fn replaced(&self) -> Result<std::sync::MutexGuard<'_, HashMap<BookId, ImageRef>>> {
        self.replaced
            .lock()
            .map_err(|_| Error::Internal("replaced-cover table poisoned".into()))
    }

    /// Remove a file whose record is going away. Absence is an error here.
    fn delete_owned(&self, image: &ImageRef) -> Result<()> {
        match self.store.delete(image)? {
            DeleteOutcome::Removed => {
                tracing::info!(%image, "removed image");
                Ok(())
            }
            DeleteOutcome::Missing => Err(Error::not_found("image", image)),
        }
    }
}

impl RecordHooks<Book> for MediaLifecycleManager {
    fn name(&self) -> &'static str {
        "cover-lifecycle"
    }

    fn pre_save(&self, conn: &Connection, book: &mut Book) -> Result<()> {
        // A failed earlier save may have left an entry behind.
        self.replaced()?.remove(&book.id);

        if book.cover.is_default_cover() {
            return Ok(());
        }

        let Some(previous) = books::get_book(conn, book.id)? else {
            return Ok(());
        };

        // The placeholder is shared by every book without a cover.
        if previous.cover == book.cover || previous.cover.is_default_cover() {
            return Ok(());
        }

        self.replaced()?.insert(book.id, previous.cover);
        Ok(())
    }

    fn post_save(&self, _conn: &Connection, book: &Book) -> Result<()> {
        let replaced = self.replaced()?.remove(&book.id);

        if !book.cover.is_default_cover() {
            let dims = self.images.cover;
            self.store.crop(&book.cover, dims.width, dims.height)?;
        }

        let Some(old) = replaced else {
            return Ok(());
        };
        match self.store.delete(&old)? {
            DeleteOutcome::Removed => {
                tracing::info!(book = %book.id, image = %old, "removed replaced cover");
            }
            DeleteOutcome::Missing => {
                tracing::debug!(book = %book.id, image = %old, "replaced cover already absent");
            }
        }
        Ok(())
    }

    fn post_delete(&self, _conn: &Connection, book: &Book) -> Result<()> {
        if book.cover.is_default_cover() {
            return Ok(());
        }
        self.delete_owned(&book.cover)
    }
}

impl RecordHooks<Carousel> for MediaLifecycleManager {
    fn name(&self) -> &'static str {
        "carousel-lifecycle"
    }

    fn post_save(&self, _conn: &Connection, slide: &Carousel) -> Result<()> {
        let dims = self.images.carousel;
        self.store.crop(&slide.img, dims.width, dims.height)
    }

    fn post_delete(&self, _conn: &Connection, slide: &Carousel) -> Result<()> {
        self.delete_owned(&slide.img)
    }
}
