//! Store configuration loaded from `config.toml`.
//!
//! ```toml
//! base_dir = "/var/lib/downloader"
//! collection = "backgroundDownloaderTaskRecords"
//! backend = "dir"
//!
//! [log]
//! level = "info"
//! format = "text"
//! ```
//!
//! Every field is optional; a missing or empty file yields the defaults.

use crate::logging::{LoggerConfig, LoggerFormat};
use crate::paths::TaskrecPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskrec_core::error::{Result, TaskrecError};
use taskrec_core::key::validate_collection;

/// Collection holding one document per tracked task.
pub const DEFAULT_COLLECTION: &str = "backgroundDownloaderTaskRecords";

/// Which document store backs the record store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per record under `base_dir`.
    #[default]
    Dir,
    /// Process memory only.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LoggerFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LoggerFormat::Text,
        }
    }
}

impl From<&LogSettings> for LoggerConfig {
    fn from(settings: &LogSettings) -> Self {
        LoggerConfig {
            format: settings.format,
            level: settings.level.clone(),
            ..LoggerConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root; defaults to the platform data directory.
    pub base_dir: Option<PathBuf>,
    pub collection: String,
    pub backend: StoreBackend,
    pub log: LogSettings,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            collection: DEFAULT_COLLECTION.to_string(),
            backend: StoreBackend::Dir,
            log: LogSettings::default(),
        }
    }
}

impl StoreConfig {
    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file exists but cannot be read or is
    /// not valid TOML for this schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file missing, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(TaskrecError::config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(&content).map_err(|e| {
            TaskrecError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that deserialization alone cannot. Call again after
    /// overriding fields.
    pub fn validate(&self) -> Result<()> {
        validate_collection(&self.collection)
    }

    /// Loads the configuration from the default location.
    pub fn load_default() -> Result<Self> {
        Self::load(TaskrecPaths::config_file()?)
    }

    /// Directory the directory backend stores records under.
    pub fn resolve_base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(TaskrecPaths::data_dir()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::load(temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.collection, DEFAULT_COLLECTION);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
base_dir = "/tmp/records"
backend = "memory"

[log]
format = "json"
"#,
        )
        .unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.base_dir, Some(PathBuf::from("/tmp/records")));
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.log.format, LoggerFormat::Json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.resolve_base_dir().unwrap(), PathBuf::from("/tmp/records"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"postgres\"").unwrap();

        let err = StoreConfig::load(&path).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "collection = \"  \"").unwrap();

        assert!(StoreConfig::load(&path).unwrap_err().is_config());
    }

    #[test]
    fn test_path_like_collection_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "collection = \"..\"").unwrap();
        assert!(StoreConfig::load(&path).unwrap_err().is_config());

        let config = StoreConfig {
            collection: "records/../..".to_string(),
            ..StoreConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());
        assert!(StoreConfig::default().validate().is_ok());
    }
}
