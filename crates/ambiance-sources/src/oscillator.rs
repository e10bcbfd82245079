//! Sine oscillator.

use core::f64::consts::TAU;

use ambiance_core::buffer::sample_time;
use ambiance_core::{Buffer, DspResult, ParamMap, ParamReader, Source, require_positive};
use serde_json::{Value, json};

use crate::{labeled, prepare, read_label};

/// Pure sine tone.
///
/// Output is `amplitude · sin(2π · frequency · t + phase)` with `t = n / sample_rate`.
/// Phase is computed in `f64` so long renders do not drift.
///
/// # Parameters
///
/// | Name | Default | Notes |
/// |------|---------|-------|
/// | `frequency` | 440 Hz | must be > 0 |
/// | `amplitude` | 0.3 | |
/// | `phase` | 0 | radians |
#[derive(Debug, Clone, PartialEq)]
pub struct Sine {
    frequency: f32,
    amplitude: f32,
    phase: f32,
    label: Option<String>,
}

impl Default for Sine {
    fn default() -> Self {
        Self::new(440.0, 0.3)
    }
}

impl Sine {
    /// Registry tag.
    pub const KIND: &'static str = "sine";

    /// Create a sine at `frequency` Hz with peak `amplitude`.
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
            label: None,
        }
    }

    /// Set the starting phase in radians.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Name this instance; the label becomes its stream identifier.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build from a parameter map.
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let frequency = require_positive(
            Self::KIND,
            "frequency",
            reader.f32_or("frequency", 440.0)?,
        )?;
        let amplitude = reader.f32_or("amplitude", 0.3)?;
        let phase = reader.f32_or("phase", 0.0)?;
        let label = read_label(&mut reader)?;
        reader.finish()?;
        Ok(Self {
            frequency,
            amplitude,
            phase,
            label,
        })
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Peak amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl Source for Sine {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer> {
        let n = prepare(duration, sample_rate)?;
        let freq = f64::from(self.frequency);
        let phase = f64::from(self.phase);
        let amp = f64::from(self.amplitude);
        Ok((0..n)
            .map(|i| (amp * (TAU * freq * sample_time(i, sample_rate) + phase).sin()) as f32)
            .collect())
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn to_config(&self) -> Value {
        labeled(
            json!({
                "type": Self::KIND,
                "frequency": self.frequency,
                "amplitude": self.amplitude,
                "phase": self.phase,
            }),
            self.label.as_deref(),
        )
    }
}
