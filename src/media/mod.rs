//! Image storage and lifecycle management.
//!
//! [`ImageStore`] is the seam between catalog records and the files backing
//! their image columns. [`LocalImageStore`] keeps those files under a media
//! root on the local filesystem, and [`MediaLifecycleManager`] hooks into
//! book and carousel saves/deletes to crop new images and remove stale ones.

mod local;
mod manager;
mod store;

pub use local::LocalImageStore;
pub use manager::MediaLifecycleManager;
pub use store::{DeleteOutcome, ImageStore};
