//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! database location, the media root, and the crop dimensions for each image
//! category. Every section defaults sensibly so a completely empty `{}` file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub images: ImageConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Strictly load configuration from a file. Any read or parse failure is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (label, dims) in [("cover", &self.images.cover), ("carousel", &self.images.carousel)] {
            if dims.width == 0 || dims.height == 0 {
                warnings.push(format!(
                    "images.{label} has a zero dimension ({}x{}); crops will fail",
                    dims.width, dims.height
                ));
            }
        }

        if self.database.path.as_os_str().is_empty() {
            warnings.push("database.path is empty".into());
        }

        if self.database.pool_size == 0 {
            warnings.push("database.pool_size is 0; the database cannot be opened".into());
        }

        if self.media.root.as_os_str().is_empty() {
            warnings.push("media.root is empty".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// SQLite database location and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Maximum number of pooled connections (default 4).
    pub pool_size: u32,
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/shelf.db"),
            pool_size: 4,
            busy_timeout_ms: 5000,
        }
    }
}

/// Where uploaded images live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/media"),
        }
    }
}

/// Target width and height of a crop, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Crop dimensions per image category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Book covers (default 210x280).
    pub cover: Dimensions,
    /// Homepage carousel slides (default 1600x900).
    pub carousel: Dimensions,
}

impl ImageConfig {
    pub const DEFAULT_COVER: Dimensions = Dimensions::new(210, 280);
    pub const DEFAULT_CAROUSEL: Dimensions = Dimensions::new(1600, 900);
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cover: Self::DEFAULT_COVER,
            carousel: Self::DEFAULT_CAROUSEL,
        }
    }
}
