//! Plucked-string resonator.

use core::f64::consts::TAU;

use ambiance_core::buffer::sample_time;
use ambiance_core::{Buffer, DspError, DspResult, ParamMap, ParamReader, Source};
use serde_json::{Value, json};

use crate::noise::gaussian;
use crate::{labeled, prepare, read_label};

/// Relative level of the noise layered onto the tone.
const NOISE_LEVEL: f64 = 0.02;

/// Tone shape for a resonator preset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Voicing {
    fundamental: f64,
    decay_rate: f64,
}

/// Known preset names and their voicing.
const PRESETS: &[(&str, Voicing)] = &[(
    "string-resonator",
    // G3, e^-3t envelope
    Voicing {
        fundamental: 196.0,
        decay_rate: 3.0,
    },
)];

fn voicing(preset: &str) -> Option<Voicing> {
    PRESETS
        .iter()
        .find(|(name, _)| *name == preset)
        .map(|(_, v)| *v)
}

/// Decaying string-like tone with a thin noise layer.
///
/// `amplitude · (e^(-decay·t) · sin(2π·f·t) + 0.02 · noise)`
#[derive(Debug, Clone, PartialEq)]
pub struct Resonator {
    preset: String,
    voicing: Voicing,
    amplitude: f32,
    seed: Option<u64>,
    label: Option<String>,
}

impl Default for Resonator {
    fn default() -> Self {
        Self {
            preset: "string-resonator".to_string(),
            voicing: PRESETS[0].1,
            amplitude: 0.25,
            seed: None,
            label: None,
        }
    }
}

impl Resonator {
    /// Registry tag.
    pub const KIND: &'static str = "resonator";

    /// Names accepted by the `preset` parameter.
    pub fn presets() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    /// Default preset at `amplitude`.
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude,
            ..Self::default()
        }
    }

    /// Fix the noise seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
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
        let preset = reader.string_or("preset", "string-resonator")?;
        let voicing = voicing(&preset).ok_or_else(|| {
            DspError::invalid(
                Self::KIND,
                "preset",
                format!(
                    "unknown preset '{preset}' (known: {})",
                    Self::presets().collect::<Vec<_>>().join(", ")
                ),
            )
        })?;
        let amplitude = reader.f32_or("amplitude", 0.25)?;
        let seed = reader.u64_opt("seed")?;
        let label = read_label(&mut reader)?;
        reader.finish()?;
        Ok(Self {
            preset,
            voicing,
            amplitude,
            seed,
            label,
        })
    }
}

impl Source for Resonator {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer> {
        let n = prepare(duration, sample_rate)?;
        let noise = gaussian(n, self.seed);
        let amp = f64::from(self.amplitude);
        let Voicing {
            fundamental,
            decay_rate,
        } = self.voicing;

        Ok(noise
            .into_iter()
            .enumerate()
            .map(|(i, z)| {
                let t = sample_time(i, sample_rate);
                let tone = (-decay_rate * t).exp() * (TAU * fundamental * t).sin();
                (amp * (tone + NOISE_LEVEL * f64::from(z))) as f32
            })
            .collect())
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn to_config(&self) -> Value {
        labeled(
            json!({
                "type": Self::KIND,
                "preset": self.preset,
                "amplitude": self.amplitude,
                "seed": self.seed,
            }),
            self.label.as_deref(),
        )
    }
}
