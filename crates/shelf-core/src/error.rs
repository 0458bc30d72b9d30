//! Unified error type for the shelf catalog.
//!
//! All crates funnel their failures into [`Error`]. Hooks return it unchanged
//! so the caller of a save or delete sees exactly what aborted the operation.

use std::fmt;

/// Unified error type covering all failure modes in shelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record (or backing file) could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "book", "image").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Record data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Decoding, cropping or encoding an image failed.
    #[error("Image error: {0}")]
    Image(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Convenience constructor for [`Error::Image`].
    pub fn image(msg: impl fmt::Display) -> Self {
        Error::Image(msg.to_string())
    }

    /// Whether this error means the looked-up thing does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Io { source } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
