//! The [`Source`] contract: anything that can generate a buffer.

use serde_json::Value;

use crate::buffer::Buffer;
use crate::error::DspResult;

/// A signal generator.
///
/// Sources hold their configuration (frequency, amplitude, seed) fixed at
/// construction and are never mutated by the engine, so `generate` takes
/// `&self`. Implementations should return `round(duration * sample_rate)`
/// samples, but the engine tolerates sources that disagree on length.
///
/// # Example
///
/// ```rust
/// use ambiance_core::{Buffer, DspResult, Source};
/// use ambiance_core::buffer::sample_count;
///
/// struct Dc(f32);
///
/// impl Source for Dc {
///     fn kind(&self) -> &'static str {
///         "dc"
///     }
///
///     fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer> {
///         Ok(vec![self.0; sample_count(duration, sample_rate)])
///     }
/// }
///
/// let dc = Dc(0.25);
/// assert_eq!(dc.stream_id(), "dc");
/// assert_eq!(dc.generate(0.001, 48000).unwrap().len(), 48);
/// ```
pub trait Source {
    /// Type identifier of the source (registry tag, e.g. `"sine"`).
    fn kind(&self) -> &'static str;

    /// Produce `duration` seconds of audio at `sample_rate`.
    fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer>;

    /// Declared name of this instance, if one was given.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Stable identifier used to look up this source's plugin stream.
    ///
    /// The declared label when present, otherwise the type identifier.
    fn stream_id(&self) -> &str {
        self.label().unwrap_or(self.kind())
    }

    /// Serializable description of this source's configuration.
    fn to_config(&self) -> Value {
        serde_json::json!({ "type": self.kind() })
    }
}
