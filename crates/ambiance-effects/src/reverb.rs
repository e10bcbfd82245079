//! Early-reflection reverb.
//!
//! Three fixed delay taps (29.7, 37.1 and 41.1 ms, mutually prime in
//! samples at common rates) are summed, scaled by `decay / 3`, and blended
//! with the dry signal:
//!
//! ```text
//! wet[n] = decay/3 · Σ x[n - dₖ]
//! y[n]   = (1 - mix) · x[n] + mix · wet[n]
//! ```
//!
//! The taps only look back within the current buffer, so the reverb has no
//! state between renders.

use ambiance_core::{
    Buffer, DspResult, Effect, ParamMap, ParamReader, require_range, wet_dry_mix,
};
use serde_json::{Value, json};

/// Tap times in seconds.
const TAP_TIMES: [f64; 3] = [0.0297, 0.0371, 0.0411];

/// Tap-based reverb.
///
/// # Parameters
///
/// | Name | Range | Default |
/// |------|-------|---------|
/// | `decay` | 0.0–1.0 | 0.5 |
/// | `mix` | 0.0–1.0 | 0.3 |
#[derive(Debug, Clone, PartialEq)]
pub struct Reverb {
    decay: f32,
    mix: f32,
}

impl Default for Reverb {
    fn default() -> Self {
        Self {
            decay: 0.5,
            mix: 0.3,
        }
    }
}

impl Reverb {
    /// Registry tag.
    pub const KIND: &'static str = "reverb";

    /// Create a reverb. Values are clamped to 0..=1.
    pub fn new(decay: f32, mix: f32) -> Self {
        Self {
            decay: decay.clamp(0.0, 1.0),
            mix: mix.clamp(0.0, 1.0),
        }
    }

    /// Build from a parameter map. Out-of-range values are rejected.
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let decay = require_range(Self::KIND, "decay", reader.f32_or("decay", 0.5)?, 0.0, 1.0)?;
        let mix = require_range(Self::KIND, "mix", reader.f32_or("mix", 0.3)?, 0.0, 1.0)?;
        reader.finish()?;
        Ok(Self { decay, mix })
    }

    /// Tap offsets in samples at `sample_rate`.
    pub fn tap_offsets(sample_rate: u32) -> [usize; 3] {
        TAP_TIMES.map(|t| (t * f64::from(sample_rate)) as usize)
    }
}

impl Effect for Reverb {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        let taps = Self::tap_offsets(sample_rate);
        let scale = self.decay / TAP_TIMES.len() as f32;

        let out = (0..buffer.len())
            .map(|n| {
                let wet: f32 = taps
                    .iter()
                    .filter(|&&d| d <= n)
                    .map(|&d| buffer[n - d])
                    .sum();
                wet_dry_mix(buffer[n], wet * scale, self.mix)
            })
            .collect();
        Ok(out)
    }

    fn to_config(&self) -> Value {
        json!({
            "type": Self::KIND,
            "decay": self.decay,
            "mix": self.mix,
        })
    }
}
