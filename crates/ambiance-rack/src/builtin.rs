//! Built-in chain processors.
//!
//! Each slot execution builds a fresh processor from `(slug, params)`, so
//! nothing survives between `process_chain` calls. Switching banks therefore
//! never carries filter state from one bank's slots into the other's.

use ambiance_core::{
    Buffer, DspResult, OnePoleHighpass, ParamMap, ParamReader, db_to_linear, require_positive,
};

use crate::descriptor::PluginDescriptor;
use crate::error::{RackError, RackResult};

/// Slug of the built-in gain processor.
pub const GAIN_SLUG: &str = "builtin-gain";

/// Slug of the built-in one-pole highpass.
pub const HIGHPASS_SLUG: &str = "builtin-highpass";

/// In-process processor usable as a chain slot.
pub trait BuiltinProcessor {
    /// Transform one buffer.
    fn process(&mut self, buffer: Buffer, sample_rate: u32) -> Buffer;
}

/// `y[n] = x[n] · 10^(gain_db / 20)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GainProcessor {
    gain_db: f32,
}

impl GainProcessor {
    /// Gain of `gain_db` decibels.
    pub fn new(gain_db: f32) -> Self {
        Self { gain_db }
    }

    /// Build from slot parameters (`gain_db`, default 0).
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(GAIN_SLUG, params);
        let gain_db = reader.f32_or("gain_db", 0.0)?;
        reader.finish()?;
        Ok(Self::new(gain_db))
    }
}

impl BuiltinProcessor for GainProcessor {
    fn process(&mut self, mut buffer: Buffer, _sample_rate: u32) -> Buffer {
        ambiance_core::buffer::scale(&mut buffer, db_to_linear(self.gain_db));
        buffer
    }
}

/// One-pole highpass whose state lives for a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct HighPassProcessor {
    cutoff: f32,
}

impl HighPassProcessor {
    /// Highpass at `cutoff` Hz.
    pub fn new(cutoff: f32) -> Self {
        Self { cutoff }
    }

    /// Build from slot parameters (`cutoff`, default 80 Hz, must be > 0).
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(HIGHPASS_SLUG, params);
        let cutoff = require_positive(HIGHPASS_SLUG, "cutoff", reader.f32_or("cutoff", 80.0)?)?;
        reader.finish()?;
        Ok(Self::new(cutoff))
    }
}

impl BuiltinProcessor for HighPassProcessor {
    fn process(&mut self, mut buffer: Buffer, sample_rate: u32) -> Buffer {
        OnePoleHighpass::new(sample_rate, self.cutoff).process_buffer(&mut buffer);
        buffer
    }
}

/// Descriptors for every built-in processor.
pub fn builtin_descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::builtin(GAIN_SLUG, "Gain"),
        PluginDescriptor::builtin(HIGHPASS_SLUG, "High-pass Filter"),
    ]
}

/// Build the processor registered under `slug`.
///
/// Unknown or malformed parameters are rejected here rather than ignored.
pub fn instantiate(slug: &str, params: &ParamMap) -> RackResult<Box<dyn BuiltinProcessor>> {
    match slug {
        GAIN_SLUG => Ok(Box::new(GainProcessor::from_params(params)?)),
        HIGHPASS_SLUG => Ok(Box::new(HighPassProcessor::from_params(params)?)),
        other => Err(RackError::UnknownProcessor(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ParamMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn zero_db_gain_is_identity() {
        let input = vec![0.5, -0.25, 0.125];
        let mut gain = instantiate(GAIN_SLUG, &params(json!({"gain_db": 0.0}))).unwrap();
        assert_eq!(gain.process(input.clone(), 48000), input);
    }

    #[test]
    fn highpass_matches_recurrence() {
        let sr = 1000;
        let cutoff = 50.0_f32;
        let rc = 1.0 / (core::f32::consts::TAU * cutoff);
        let dt = 1.0 / sr as f32;
        let alpha = rc / (rc + dt);

        let mut hp = HighPassProcessor::new(cutoff);
        let out = hp.process(vec![1.0, 1.0, 0.0], sr);
        let y0 = alpha * 1.0;
        let y1 = alpha * (y0 + 1.0 - 1.0);
        let y2 = alpha * (y1 + 0.0 - 1.0);
        assert!((out[0] - y0).abs() < 1e-6);
        assert!((out[1] - y1).abs() < 1e-6);
        assert!((out[2] - y2).abs() < 1e-6);
    }

    #[test]
    fn highpass_state_is_per_call() {
        let mut hp = HighPassProcessor::new(200.0);
        let first = hp.process(vec![1.0; 16], 8000);
        let second = hp.process(vec![1.0; 16], 8000);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_parameters_are_rejected() {
        let err = instantiate(GAIN_SLUG, &params(json!({"volume": 3.0})))
            .err()
            .unwrap();
        assert!(matches!(err, RackError::Dsp(_)));
    }

    #[test]
    fn unknown_slug_is_reported() {
        let err = instantiate("builtin-fuzz", &ParamMap::new()).err().unwrap();
        assert!(matches!(err, RackError::UnknownProcessor(ref s) if s == "builtin-fuzz"));
    }
}
