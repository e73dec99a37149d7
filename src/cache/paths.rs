// Cache and config path utilities.
// Constructs filesystem paths for the project feed cache and persisted settings.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/folio on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the base config directory (~/.config/folio on Linux).
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the persisted display language code.
pub fn language_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("language"))
}
