//! Filesystem-backed image storage.
//!
//! Images live under `{root}/{category}/{YYYY}/{MM}/{DD}/{file}` and are
//! referenced by their path relative to `root`. The shared cover placeholder
//! sits at `{root}/book_cover/default.jpg`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::imageops::FilterType;
use image::{ImageError, ImageFormat};
use shelf_core::config::ImageConfig;
use shelf_core::{Error, ImageCategory, ImageRef, Result};
use uuid::Uuid;

use super::store::{DeleteOutcome, ImageStore};

/// Placeholder fill colour (light grey).
const PLACEHOLDER_RGB: [u8; 3] = [0xdd, 0xdd, 0xdd];

/// Filesystem manager for catalog images.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    /// Create a new `LocalImageStore` rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file behind an image reference.
    ///
    /// References that could leave the media root are refused.
    pub fn resolve(&self, image: &ImageRef) -> Result<PathBuf> {
        image.check()?;
        Ok(self.root.join(image.as_str()))
    }

    /// Whether the file behind `image` exists.
    pub fn exists(&self, image: &ImageRef) -> bool {
        self.resolve(image).is_ok_and(|p| p.is_file())
    }

    /// Store an uploaded image and return its reference.
    ///
    /// The file lands in a dated directory under the category's folder. Its
    /// name is sanitized, given an extension matching the detected format if
    /// it has none, and suffixed with a short random token if the name is
    /// already taken. Bytes that do not decode as an image are rejected.
    pub fn store_upload(
        &self,
        category: ImageCategory,
        file_name: &str,
        data: &[u8],
    ) -> Result<ImageRef> {
        let format = image::guess_format(data)
            .map_err(|e| Error::validation(format!("upload '{file_name}' is not an image: {e}")))?;
        image::load_from_memory_with_format(data, format)
            .map_err(|e| Error::validation(format!("upload '{file_name}' failed to decode: {e}")))?;

        let dated_dir = format!(
            "{}/{}",
            category.directory(),
            Utc::now().format("%Y/%m/%d")
        );
        let dir = self.root.join(&dated_dir);
        std::fs::create_dir_all(&dir)?;

        let (stem, ext) = split_file_name(file_name, format);
        let mut name = format!("{stem}.{ext}");
        while dir.join(&name).exists() {
            let token = Uuid::new_v4().simple().to_string();
            name = format!("{stem}_{}.{ext}", &token[..7]);
        }

        let path = dir.join(&name);
        std::fs::write(&path, data)?;
        tracing::debug!(path = %path.display(), %category, "stored upload");

        Ok(ImageRef::new(format!("{dated_dir}/{name}")))
    }

    /// Write the cover placeholder if it is not there yet.
    ///
    /// Returns `true` when a new placeholder was written.
    pub fn ensure_placeholder(&self) -> Result<bool> {
        let path = self.resolve(&ImageRef::default_cover())?;
        if path.is_file() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let dims = ImageConfig::DEFAULT_COVER;
        let img = image::RgbImage::from_pixel(dims.width, dims.height, image::Rgb(PLACEHOLDER_RGB));
        img.save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|e| image_error(e, &path))?;
        tracing::info!(path = %path.display(), "wrote cover placeholder");
        Ok(true)
    }
}

impl ImageStore for LocalImageStore {
    fn crop(&self, image: &ImageRef, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::validation(format!(
                "cannot crop {image} to {width}x{height}"
            )));
        }

        let path = self.resolve(image)?;
        let img = image::open(&path).map_err(|e| image_error(e, &path))?;

        if img.width() == width && img.height() == height {
            tracing::debug!(%image, width, height, "image already at target size");
            return Ok(());
        }

        let cropped = img.resize_to_fill(width, height, FilterType::Lanczos3);
        cropped.save(&path).map_err(|e| image_error(e, &path))?;
        tracing::debug!(
            %image,
            from_width = img.width(),
            from_height = img.height(),
            width,
            height,
            "cropped image"
        );
        Ok(())
    }

    fn delete(&self, image: &ImageRef) -> Result<DeleteOutcome> {
        let path = self.resolve(image)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(DeleteOutcome::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DeleteOutcome::Missing),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keep I/O failures as [`Error::Io`] so "not found" stays recognizable.
fn image_error(e: ImageError, path: &Path) -> Error {
    match e {
        ImageError::IoError(io) => Error::from(io),
        other => Error::image(format!("{}: {other}", path.display())),
    }
}

/// Sanitize an uploaded file name into `(stem, extension)`.
fn split_file_name(file_name: &str, format: ImageFormat) -> (String, String) {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let path = Path::new(base);

    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(clean)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && ImageFormat::from_extension(e).is_some())
        .or_else(|| format.extensions_str().first().map(|e| e.to_string()))
        .unwrap_or_else(|| "img".to_string());

    (stem, ext)
}
