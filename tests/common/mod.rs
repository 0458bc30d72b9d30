//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires an in-memory DB, a [`LocalImageStore`]
//! rooted in a temp directory, and a [`Catalog`] over both. Image fixtures are
//! generated in memory with the `image` crate.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::ImageFormat;
use shelf::catalog::Catalog;
use shelf::media::{DeleteOutcome, ImageStore, LocalImageStore};
use shelf_core::config::ImageConfig;
use shelf_core::{ImageCategory, ImageRef, Result};
use shelf_db::models::{Author, Book, Publisher, Tag};
use shelf_db::pool::{init_memory_pool, DbPool, PooledConnection};
use tempfile::TempDir;

/// Test harness with a catalog backed by an in-memory database and a real
/// filesystem image store.
pub struct TestHarness {
    pub catalog: Catalog,
    pub store: Arc<LocalImageStore>,
    pub db: DbPool,
    _media: TempDir,
}

impl TestHarness {
    /// Create a new harness with the default image sizes.
    pub fn new() -> Self {
        Self::with_images(ImageConfig::default())
    }

    pub fn with_images(images: ImageConfig) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let store = Arc::new(LocalImageStore::new(media.path().to_path_buf()));
        store.ensure_placeholder().expect("failed to write placeholder");
        let catalog = Catalog::new(db.clone(), store.clone(), images);

        Self {
            catalog,
            store,
            db,
            _media: media,
        }
    }

    pub fn conn(&self) -> PooledConnection {
        self.db.get().expect("failed to get connection")
    }

    pub fn create_author(&self, name: &str) -> Author {
        let mut author = Author::new(name);
        self.catalog.save_author(&mut author).expect("save author");
        author
    }

    pub fn create_publisher(&self, name: &str) -> Publisher {
        let mut publisher = Publisher::new(name);
        self.catalog.save_publisher(&mut publisher).expect("save publisher");
        publisher
    }

    pub fn create_tag(&self, name: &str) -> Tag {
        let mut tag = Tag::new(name);
        self.catalog.save_tag(&mut tag).expect("save tag");
        tag
    }

    pub fn create_book(&self, name: &str, author: &Author) -> Book {
        let mut book = Book::new(name, author.id);
        self.catalog.save_book(&mut book).expect("save book");
        book
    }

    /// Store a generated PNG of the given size and return its reference.
    pub fn upload(&self, category: ImageCategory, name: &str, width: u32, height: u32) -> ImageRef {
        self.store
            .store_upload(category, name, &png_bytes(width, height))
            .expect("store upload")
    }

    pub fn dimensions(&self, image: &ImageRef) -> (u32, u32) {
        let img = image::open(self.store.resolve(image).expect("resolve image")).expect("open image");
        (img.width(), img.height())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

/// An [`ImageStore`] that records every call and touches no files.
///
/// References listed in `present` report [`DeleteOutcome::Removed`] once;
/// everything else is missing.
#[derive(Default)]
pub struct RecordingStore {
    pub present: Mutex<Vec<String>>,
    pub crops: Mutex<Vec<(String, u32, u32)>>,
    pub deletes: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn with_present(files: &[&str]) -> Arc<Self> {
        let store = Self::default();
        store
            .present
            .lock()
            .unwrap()
            .extend(files.iter().map(|f| f.to_string()));
        Arc::new(store)
    }

    pub fn crops(&self) -> Vec<(String, u32, u32)> {
        self.crops.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl ImageStore for RecordingStore {
    fn crop(&self, image: &ImageRef, width: u32, height: u32) -> Result<()> {
        self.crops
            .lock()
            .unwrap()
            .push((image.to_string(), width, height));
        Ok(())
    }

    fn delete(&self, image: &ImageRef) -> Result<DeleteOutcome> {
        self.deletes.lock().unwrap().push(image.to_string());
        let mut present = self.present.lock().unwrap();
        match present.iter().position(|p| p == image.as_str()) {
            Some(i) => {
                present.remove(i);
                Ok(DeleteOutcome::Removed)
            }
            None => Ok(DeleteOutcome::Missing),
        }
    }
}
