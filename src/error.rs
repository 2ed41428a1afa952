use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for plugin-version operations
#[derive(Error, Debug)]
pub enum PluginVersionError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No version marker found in {}", .0.display())]
    VersionNotFound(PathBuf),

    #[error("Resolved version is empty")]
    EmptyVersion,

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in plugin-version
pub type Result<T> = std::result::Result<T, PluginVersionError>;

impl PluginVersionError {
    /// Create a file-not-found error for the given path
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        PluginVersionError::FileNotFound(path.as_ref().to_path_buf())
    }

    /// Create a version-not-found error for the given path
    pub fn version_not_found(path: impl AsRef<Path>) -> Self {
        PluginVersionError::VersionNotFound(path.as_ref().to_path_buf())
    }

    /// Create an invalid version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        PluginVersionError::InvalidVersion(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PluginVersionError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        PluginVersionError::Manifest(msg.into())
    }
}
