//! shelf-core: shared types, IDs, errors, configuration, and slug derivation.
//!
//! This crate is the foundational dependency for the other shelf crates,
//! providing type-safe identifiers, a unified error type, image references,
//! application configuration, and the slug rules every catalog record uses.

pub mod config;
pub mod error;
pub mod ids;
pub mod media;
pub mod slug;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use media::*;
