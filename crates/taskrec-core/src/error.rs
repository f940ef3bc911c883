//! Error types for the taskrec record store.

use thiserror::Error;

/// A shared error type for every layer of taskrec.
///
/// Absence of a record is never represented here: lookups return `Option`
/// and listings return an empty `Vec`. Everything in this enum is a real
/// failure that is propagated unchanged to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskrecError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (document store layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// A stored `status` ordinal that no `TaskStatus` member maps to
    #[error("Invalid task status ordinal: {0}")]
    InvalidStatus(u64),

    /// A stored document that cannot be decoded into a record
    #[error("Invalid document '{key}': {message}")]
    InvalidDocument { key: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaskrecError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a JSON serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates an InvalidDocument error
    pub fn invalid_document(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error was caused by undecodable stored data.
    ///
    /// Covers malformed JSON, out-of-range status ordinals and documents
    /// whose fields have the wrong shape.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            Self::Serialization { .. } | Self::InvalidStatus(_) | Self::InvalidDocument { .. }
        )
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TaskrecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TaskrecError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

impl From<toml::de::Error> for TaskrecError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TaskrecError>`.
pub type Result<T> = std::result::Result<T, TaskrecError>;
