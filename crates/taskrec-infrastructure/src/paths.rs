//! Unified path management for taskrec.
//!
//! ```text
//! ~/.config/taskrec/           # Config directory
//! └── config.toml              # Store and logging configuration
//!
//! ~/.local/share/taskrec/      # Data directory, default store root
//! └── backgroundDownloaderTaskRecords/
//!     └── <task-key>.json
//! ```

use std::path::PathBuf;
use taskrec_core::TaskrecError;

const APP_DIR_NAME: &str = "taskrec";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for TaskrecError {
    fn from(err: PathError) -> Self {
        TaskrecError::config(err.to_string())
    }
}

/// Platform directories for taskrec (XDG on Linux, the native locations
/// elsewhere).
pub struct TaskrecPaths;

impl TaskrecPaths {
    /// Returns the taskrec configuration directory (e.g. `~/.config/taskrec/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the taskrec data directory (e.g. `~/.local/share/taskrec/`).
    ///
    /// This is the default root of the record store.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
