//! shelf-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, and query modules for every
//! catalog record: books, authors, publishers, tags, polls, and carousel
//! slides.
//!
//! # Example
//!
//! ```
//! use shelf_db::models::Author;
//! use shelf_db::pool::{get_conn, init_memory_pool};
//! use shelf_db::queries::authors;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let mut author = Author::new("Ursula K. Le Guin");
//! author.slug = "ursula-k-le-guin".into();
//! authors::save_author(&conn, &author).unwrap();
//! assert!(authors::get_author(&conn, author.id).unwrap().is_some());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
