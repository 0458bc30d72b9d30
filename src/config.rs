//! Config file discovery and path expansion for the binary.

use std::path::{Path, PathBuf};

use shelf_core::config::Config;

/// Locations searched when no `--config` is given, in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./shelf.json",
    "~/.config/shelf/config.json",
    "/etc/shelf/config.json",
];

/// Expand a leading `~` in a path.
pub fn expand(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

/// The config file to use: the explicit one, or the first default that exists.
pub fn find_config(custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        return Some(expand(path));
    }

    DEFAULT_CONFIG_PATHS
        .iter()
        .map(|p| expand(Path::new(p)))
        .find(|p| p.exists())
}

/// Load the config the binary runs with.
///
/// Falls back to defaults when nothing is found or the file is unusable.
/// Database and media paths have `~` expanded.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Config {
    let path = find_config(custom_path);
    let mut config = Config::load_or_default(path.as_deref());
    config.database.path = expand(&config.database.path);
    config.media.root = expand(&config.media.root);
    config
}
