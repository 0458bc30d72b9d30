//! shelf: a book catalog with managed cover and carousel images.
//!
//! The library crate holds the record lifecycle ([`catalog`]), image storage
//! ([`media`]), the console list views ([`admin`]) and config discovery
//! ([`config`]). Data types and queries live in `shelf-core` and `shelf-db`.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod media;
