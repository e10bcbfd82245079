//! Engine error type.

use std::path::PathBuf;

use ambiance_core::DspError;
use ambiance_rack::RackError;
use ambiance_registry::RegistryError;
use thiserror::Error;

/// Errors raised while configuring or running an [`AudioEngine`](crate::AudioEngine).
///
/// A failing source or effect aborts the whole render. Plugin rack problems
/// never show up here during a render; the rack absorbs them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid duration or sample rate.
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// A source failed to generate.
    #[error("source '{name}' failed: {source}")]
    Source {
        /// Stream identifier of the source.
        name: String,
        /// Underlying error.
        #[source]
        source: DspError,
    },

    /// An effect failed to apply.
    #[error("effect '{name}' failed: {source}")]
    Effect {
        /// Type identifier of the effect.
        name: String,
        /// Underlying error.
        #[source]
        source: DspError,
    },

    /// A pipeline stage produced NaN or infinite samples.
    #[error("non-finite samples after {stage}")]
    NonFinite {
        /// Stage that produced the samples.
        stage: String,
    },

    /// Unknown source/effect type or bad constructor parameters.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Plugin catalog or rack file problem.
    #[error(transparent)]
    Rack(#[from] RackError),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("invalid project file '{path}': {source}")]
    Json {
        /// Path of the project file.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// WAV encoding or decoding failed.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),
}

impl EngineError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EngineError::Json {
            path: path.into(),
            source,
        }
    }

    fn non_finite(stage: impl Into<String>) -> Self {
        EngineError::NonFinite {
            stage: stage.into(),
        }
    }
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

pub(crate) fn ensure_finite(samples: &[f32], stage: impl FnOnce() -> String) -> EngineResult<()> {
    if ambiance_core::buffer::is_finite(samples) {
        Ok(())
    } else {
        Err(EngineError::non_finite(stage()))
    }
}
