//! Error types for plugin library and chain operations.

use std::path::PathBuf;

use ambiance_core::DspError;
use thiserror::Error;

/// Errors raised by the plugin library, hosts, and rack configuration.
///
/// Only registration and file operations surface these to callers. During
/// chain execution every variant is absorbed into a pass-through and
/// recorded as a [`SlotFailure`](crate::SlotFailure).
#[derive(Debug, Error)]
pub enum RackError {
    /// A plugin path given for registration does not exist.
    #[error("plugin not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The external processing backend is missing or not configured.
    #[error("external plugin backend unavailable: {0}")]
    Unavailable(String),

    /// No built-in processor is registered under this slug.
    #[error("unknown built-in processor '{0}'")]
    UnknownProcessor(String),

    /// The external backend ran but failed.
    #[error("external plugin '{slug}' failed: {reason}")]
    External {
        /// Slug of the failing plugin.
        slug: String,
        /// Backend-provided reason.
        reason: String,
    },

    /// A processor returned a buffer that cannot continue down the chain.
    #[error("plugin '{slug}' returned unusable output: {reason}")]
    InvalidOutput {
        /// Slug of the offending plugin.
        slug: String,
        /// What was wrong with the buffer.
        reason: String,
    },

    /// A built-in processor rejected its parameters.
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        /// File being read or written.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl RackError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RackError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RackError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RackError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        RackError::Json {
            path: path.into(),
            source,
        }
    }

    /// Create an external failure error.
    pub fn external(slug: impl Into<String>, reason: impl Into<String>) -> Self {
        RackError::External {
            slug: slug.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for rack operations.
pub type RackResult<T> = Result<T, RackError>;
