//! Error types for vramslot
//!
//! All modules use `VramslotResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vramslot operations
pub type VramslotResult<T> = Result<T, VramslotError>;

/// All errors that can occur in vramslot
#[derive(Error, Debug)]
pub enum VramslotError {
    // Registry errors
    #[error("Unknown model variant '{id}'. Choose from {}", .valid.join(", "))]
    UnknownVariant { id: String, valid: Vec<String> },

    // Provisioning errors
    #[error("Expected weight {0} missing. Did the download succeed?")]
    MissingArtifact(PathBuf),

    #[error("Failed to fetch {artifact}: {reason}")]
    FetchFailed { artifact: String, reason: String },

    // Construction errors
    #[error("Failed to construct runner for '{variant}': {reason}")]
    Construction { variant: String, reason: String },

    #[error("Invalid runner descriptor at {path}: {reason}")]
    DescriptorInvalid { path: PathBuf, reason: String },

    // Device errors
    #[error("Device transfer of '{variant}' to {target} failed: {reason}")]
    DeviceTransfer {
        variant: String,
        target: String,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl VramslotError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a construction error for a variant
    pub fn construction(variant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            variant: variant.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// A failed construction leaves the runner slot empty, so the next request
    /// builds it from scratch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Construction { .. } | Self::FetchFailed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownVariant { .. } => Some("Run: vramslot variants"),
            Self::MissingArtifact(_) => Some("Run: vramslot fetch"),
            Self::FetchFailed { .. } => Some("Check that pget is installed and the base_url is reachable"),
            _ => None,
        }
    }
}
