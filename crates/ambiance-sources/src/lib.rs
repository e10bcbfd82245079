//! Ambiance Sources - procedural signal generators
//!
//! Every type here implements [`ambiance_core::Source`]: configuration is
//! fixed at construction and `generate` is a pure function of
//! `(duration, sample_rate)` plus, for noisy sources, an optional seed.
//!
//! # Sources
//!
//! - [`Sine`] - `amplitude · sin(2π·f·t + phase)`
//! - [`Noise`] - Gaussian white noise, reproducible when seeded
//! - [`Resonator`] - Decaying plucked-string tone with a little noise
//! - [`FormantVoice`] - 110 Hz carrier shaped by three vowel formants
//!
//! Each source can be built directly or from a [`ParamMap`](ambiance_core::ParamMap)
//! with `from_params`, which rejects unknown keys. All sources accept an
//! optional `label` parameter that becomes their plugin stream identifier.
//!
//! ```rust
//! use ambiance_core::Source;
//! use ambiance_sources::Sine;
//!
//! let sine = Sine::new(440.0, 0.2).with_label("lead");
//! let buffer = sine.generate(0.05, 48000).unwrap();
//! assert_eq!(buffer.len(), 2400);
//! assert_eq!(sine.stream_id(), "lead");
//! ```

pub mod formant;
pub mod noise;
pub mod oscillator;
pub mod resonator;

pub use formant::{FormantVoice, Vowel};
pub use noise::{Noise, gaussian};
pub use oscillator::Sine;
pub use resonator::Resonator;

use ambiance_core::{DspResult, ParamReader, validate_duration, validate_sample_rate};
use serde_json::Value;

/// Validate render inputs and return the sample count.
pub(crate) fn prepare(duration: f64, sample_rate: u32) -> DspResult<usize> {
    let duration = validate_duration(duration)?;
    let sample_rate = validate_sample_rate(sample_rate)?;
    Ok(ambiance_core::buffer::sample_count(duration, sample_rate))
}

pub(crate) fn read_label(reader: &mut ParamReader<'_>) -> DspResult<Option<String>> {
    reader.string_opt("label")
}

/// Add the `label` key to a config object when one is set.
pub(crate) fn labeled(mut config: Value, label: Option<&str>) -> Value {
    if let (Some(label), Some(map)) = (label, config.as_object_mut()) {
        map.insert("label".to_string(), Value::String(label.to_string()));
    }
    config
}
