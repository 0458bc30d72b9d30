//! The image storage seam used by the lifecycle hooks.

use shelf_core::{ImageRef, Result};

/// What happened when an image file was asked to be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file existed and is gone now.
    Removed,
    /// There was no file at that reference.
    Missing,
}

/// Backing storage for image references.
///
/// A missing file on delete is reported as [`DeleteOutcome::Missing`], never
/// as an error, so callers can decide whether absence is benign. Any other
/// failure is returned as an error.
pub trait ImageStore: Send + Sync {
    /// Resize and centre-crop the image to exactly `width` x `height`, in place.
    fn crop(&self, image: &ImageRef, width: u32, height: u32) -> Result<()>;

    /// Remove the file behind `image`.
    fn delete(&self, image: &ImageRef) -> Result<DeleteOutcome>;
}
