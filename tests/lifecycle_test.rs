//! Cover and carousel image lifecycle through the catalog.

mod common;

use std::sync::Arc;

use common::{RecordingStore, TestHarness};
use shelf::catalog::Catalog;
use shelf::media::{DeleteOutcome, ImageStore};
use shelf_core::config::{Dimensions, ImageConfig};
use shelf_core::{Error, ImageCategory, ImageRef, Result, DEFAULT_COVER};
use shelf_db::models::{Author, Book, Carousel};
use shelf_db::pool::init_memory_pool;
use shelf_db::queries::{books, carousels, polls};

#[test]
fn replace_cover_scenario() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);

    assert_eq!(book.slug, "b1-by-a");
    assert!(book.cover.is_default_cover());
    let poll = polls::get_poll_for_book(&h.conn(), book.id).unwrap().unwrap();
    assert_eq!((poll.up, poll.down), (0, 0));

    let f1 = h.upload(ImageCategory::Cover, "f1.png", 300, 300);
    book.cover = f1.clone();
    h.catalog.save_book(&mut book).unwrap();
    assert_eq!(h.dimensions(&f1), (210, 280));

    let f2 = h.upload(ImageCategory::Cover, "f2.png", 640, 480);
    book.cover = f2.clone();
    h.catalog.save_book(&mut book).unwrap();

    assert!(!h.store.exists(&f1));
    assert!(h.store.exists(&f2));
    assert_eq!(h.dimensions(&f2), (210, 280));
    assert!(h.store.exists(&ImageRef::default_cover()));

    let stored = books::get_book(&h.conn(), book.id).unwrap().unwrap();
    assert_eq!(stored.cover, f2);
    assert_eq!(stored.slug, "b1-by-a");
    assert_eq!(polls::list_polls(&h.conn()).unwrap().len(), 1);
}

#[test]
fn cover_crop_uses_configured_size() {
    let h = TestHarness::with_images(ImageConfig {
        cover: Dimensions::new(120, 160),
        ..ImageConfig::default()
    });
    let author = h.create_author("A");
    let mut book = Book::new("B1", author.id);
    book.cover = h.upload(ImageCategory::Cover, "c.png", 500, 500);
    h.catalog.save_book(&mut book).unwrap();
    assert_eq!(h.dimensions(&book.cover), (120, 160));
}

#[test]
fn default_cover_never_cropped_or_deleted() {
    let store = RecordingStore::with_present(&[DEFAULT_COVER]);
    let pool = init_memory_pool().unwrap();
    let catalog = Catalog::new(pool, store.clone(), ImageConfig::default());

    let mut author = Author::new("A");
    catalog.save_author(&mut author).unwrap();
    let mut book = Book::new("B1", author.id);
    catalog.save_book(&mut book).unwrap();

    book.intro = "second save".into();
    catalog.save_book(&mut book).unwrap();

    // back to the placeholder after a real cover
    book.cover = ImageRef::new("book_cover/f1.jpg");
    catalog.save_book(&mut book).unwrap();
    book.cover = ImageRef::default_cover();
    catalog.save_book(&mut book).unwrap();

    catalog.delete_book(book.id).unwrap();

    assert!(store.deletes().iter().all(|d| d != DEFAULT_COVER));
    assert!(store.crops().iter().all(|(c, _, _)| c != DEFAULT_COVER));
    assert_eq!(
        store.crops(),
        vec![("book_cover/f1.jpg".to_string(), 210, 280)]
    );
}

#[test]
fn delete_placeholder_book_touches_no_files() {
    let store = RecordingStore::with_present(&[DEFAULT_COVER]);
    let pool = init_memory_pool().unwrap();
    let catalog = Catalog::new(pool.clone(), store.clone(), ImageConfig::default());

    let mut author = Author::new("A");
    catalog.save_author(&mut author).unwrap();
    let mut book = Book::new("B1", author.id);
    catalog.save_book(&mut book).unwrap();
    catalog.delete_book(book.id).unwrap();

    assert!(store.deletes().is_empty());
    let conn = pool.get().unwrap();
    assert!(books::get_book(&conn, book.id).unwrap().is_none());
}

#[test]
fn missing_old_cover_does_not_block_replacement() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);

    let f1 = h.upload(ImageCategory::Cover, "f1.png", 300, 400);
    book.cover = f1.clone();
    h.catalog.save_book(&mut book).unwrap();
    std::fs::remove_file(h.store.resolve(&f1).unwrap()).unwrap();

    let f2 = h.upload(ImageCategory::Cover, "f2.png", 300, 400);
    book.cover = f2.clone();
    h.catalog.save_book(&mut book).unwrap();
    assert_eq!(books::get_book(&h.conn(), book.id).unwrap().unwrap().cover, f2);
}

#[test]
fn delete_book_removes_cover_and_poll() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);
    book.cover = h.upload(ImageCategory::Cover, "f1.png", 300, 400);
    h.catalog.save_book(&mut book).unwrap();

    h.catalog.delete_book(book.id).unwrap();

    let conn = h.conn();
    assert!(!h.store.exists(&book.cover));
    assert!(books::get_book(&conn, book.id).unwrap().is_none());
    assert!(polls::get_poll_for_book(&conn, book.id).unwrap().is_none());
}

#[test]
fn delete_book_with_missing_cover_fails_and_keeps_row() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);
    book.cover = h.upload(ImageCategory::Cover, "f1.png", 300, 400);
    h.catalog.save_book(&mut book).unwrap();
    std::fs::remove_file(h.store.resolve(&book.cover).unwrap()).unwrap();

    let err = h.catalog.delete_book(book.id).unwrap_err();
    assert!(matches!(err, Error::NotFound { ref entity, .. } if entity == "image"));
    assert!(books::get_book(&h.conn(), book.id).unwrap().is_some());
}

#[test]
fn carousel_cropped_and_deleted() {
    let h = TestHarness::new();
    let mut slide = Carousel::new(h.upload(ImageCategory::Carousel, "s.png", 2000, 2000));
    slide.name = "spring".into();
    slide.link = "https://example.com/".into();
    h.catalog.save_carousel(&mut slide).unwrap();
    assert_eq!(h.dimensions(&slide.img), (1600, 900));

    h.catalog.delete_carousel(slide.id).unwrap();
    assert!(!h.store.exists(&slide.img));
    assert!(carousels::get_carousel(&h.conn(), slide.id).unwrap().is_none());
}

#[test]
fn carousel_on_placeholder_path_still_deleted() {
    let h = TestHarness::new();
    let mut slide = Carousel::new(ImageRef::default_cover());
    h.catalog.save_carousel(&mut slide).unwrap();
    h.catalog.delete_carousel(slide.id).unwrap();
    assert!(!h.store.exists(&ImageRef::default_cover()));
}

/// Fails every delete with a permission error.
struct LockedStore;

impl ImageStore for LockedStore {
    fn crop(&self, _image: &ImageRef, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _image: &ImageRef) -> Result<DeleteOutcome> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

#[test]
fn delete_failure_during_replacement_aborts_save() {
    let pool = init_memory_pool().unwrap();
    let catalog = Catalog::new(pool.clone(), Arc::new(LockedStore), ImageConfig::default());

    let mut author = Author::new("A");
    catalog.save_author(&mut author).unwrap();
    let mut book = Book::new("B1", author.id);
    book.cover = ImageRef::new("book_cover/f1.jpg");
    catalog.save_book(&mut book).unwrap();

    book.cover = ImageRef::new("book_cover/f2.jpg");
    let err = catalog.save_book(&mut book).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));

    let conn = pool.get().unwrap();
    let stored = books::get_book(&conn, book.id).unwrap().unwrap();
    assert_eq!(stored.cover, ImageRef::new("book_cover/f1.jpg"));
}

#[test]
fn conflicting_save_keeps_old_cover() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    h.create_book("B1", &author);
    let mut b2 = h.create_book("B2", &author);

    let f1 = h.upload(ImageCategory::Cover, "f1.png", 300, 400);
    b2.cover = f1.clone();
    h.catalog.save_book(&mut b2).unwrap();

    // renaming onto an existing (name, author) pair is rejected
    let f2 = h.upload(ImageCategory::Cover, "f2.png", 300, 400);
    b2.name = "B1".into();
    b2.cover = f2.clone();
    let err = h.catalog.save_book(&mut b2).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let stored = books::get_book(&h.conn(), b2.id).unwrap().unwrap();
    assert_eq!(stored.name, "B2");
    assert_eq!(stored.cover, f1);
    assert!(h.store.exists(&f1));

    // a later valid save still replaces f1
    b2.name = "B2".into();
    h.catalog.save_book(&mut b2).unwrap();
    assert!(!h.store.exists(&f1));
    assert!(h.store.exists(&f2));
}

#[test]
fn cover_path_aliasing_placeholder_rejected() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);

    book.cover = ImageRef::new("book_cover/2024/01/01/../../../default.jpg");
    let err = h.catalog.save_book(&mut book).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    h.catalog.delete_book(book.id).unwrap();
    assert!(h.store.exists(&ImageRef::default_cover()));
}

#[test]
fn carousel_path_outside_root_rejected() {
    let h = TestHarness::new();
    let mut slide = Carousel::new(ImageRef::new("carousel/../../elsewhere.jpg"));
    assert!(matches!(
        h.catalog.save_carousel(&mut slide),
        Err(Error::Validation(_))
    ));
    assert!(carousels::get_carousel(&h.conn(), slide.id).unwrap().is_none());
}

#[test]
fn failed_crop_keeps_previous_cover() {
    let h = TestHarness::new();
    let author = h.create_author("A");
    let mut book = h.create_book("B1", &author);
    let f1 = h.upload(ImageCategory::Cover, "f1.png", 300, 400);
    book.cover = f1.clone();
    h.catalog.save_book(&mut book).unwrap();

    // a reference with no file behind it cannot be cropped
    book.cover = ImageRef::new("book_cover/never-uploaded.png");
    assert!(h.catalog.save_book(&mut book).unwrap_err().is_not_found());

    let stored = books::get_book(&h.conn(), book.id).unwrap().unwrap();
    assert_eq!(stored.cover, f1);
    assert!(h.store.exists(&f1));
}
