//! Image references and categories.
//!
//! An [`ImageRef`] is the value stored in a record's image column: a path
//! relative to the configured media root, always using `/` separators.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::Error;

/// Relative path of the shared cover placeholder. Never cropped, never deleted.
pub const DEFAULT_COVER: &str = "book_cover/default.jpg";

/// Which kind of record an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    /// A book's cover image.
    Cover,
    /// A homepage carousel slide.
    Carousel,
}

impl ImageCategory {
    /// Top-level directory under the media root for uploads of this category.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Cover => "book_cover",
            Self::Carousel => "carousel",
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => write!(f, "cover"),
            Self::Carousel => write!(f, "carousel"),
        }
    }
}

/// Reference to an image file, relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Build a reference, normalizing separators and stripping leading `./` or `/`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path.as_ref().replace('\\', "/");
        let mut trimmed = normalized.as_str();
        loop {
            if let Some(rest) = trimmed.strip_prefix("./") {
                trimmed = rest;
            } else if let Some(rest) = trimmed.strip_prefix('/') {
                trimmed = rest;
            } else {
                break;
            }
        }
        Self(trimmed.to_string())
    }

    /// The shared cover placeholder.
    pub fn default_cover() -> Self {
        Self(DEFAULT_COVER.to_string())
    }

    /// Whether this reference points at the shared cover placeholder.
    ///
    /// Only meaningful for references that pass [`ImageRef::check`]; a path
    /// with `..` segments could name the placeholder under another spelling.
    pub fn is_default_cover(&self) -> bool {
        self.0 == DEFAULT_COVER
    }

    /// Reject references that could name a file outside the media root or
    /// alias another reference: empty paths, empty segments, `.` and `..`.
    pub fn check(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::validation("image path must not be empty"));
        }
        for segment in self.0.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains(':') {
                return Err(Error::validation(format!(
                    "image path '{}' has an invalid segment '{segment}'",
                    self.0
                )));
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cover_detected() {
        assert!(ImageRef::default_cover().is_default_cover());
        assert!(ImageRef::new("book_cover/default.jpg").is_default_cover());
    }

    #[test]
    fn backslashes_normalized() {
        let r = ImageRef::new("book_cover\\default.jpg");
        assert_eq!(r.as_str(), "book_cover/default.jpg");
        assert!(r.is_default_cover());
    }

    #[test]
    fn leading_separators_stripped() {
        assert_eq!(ImageRef::new("./carousel/a.png").as_str(), "carousel/a.png");
        assert_eq!(ImageRef::new("/carousel/a.png").as_str(), "carousel/a.png");
    }

    #[test]
    fn uploaded_cover_is_not_default() {
        let r = ImageRef::new("book_cover/2024/05/27/default.jpg");
        assert!(!r.is_default_cover());
    }

    #[test]
    fn check_accepts_plain_paths() {
        assert!(ImageRef::default_cover().check().is_ok());
        assert!(ImageRef::new("carousel/2024/05/27/slide_a1b2c3d.png").check().is_ok());
    }

    #[test]
    fn check_rejects_escapes_and_aliases() {
        for bad in [
            "",
            "book_cover/2024/05/27/../../../default.jpg",
            "../outside.jpg",
            "book_cover/./default.jpg",
            "book_cover//default.jpg",
            "book_cover/",
            "C:/covers/a.jpg",
        ] {
            let err = ImageRef::new(bad).check().unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{bad:?} accepted");
        }
    }

    #[test]
    fn category_directories() {
        assert_eq!(ImageCategory::Cover.directory(), "book_cover");
        assert_eq!(ImageCategory::Carousel.directory(), "carousel");
    }
}
