//! Formant voice synthesis.
//!
//! A 110 Hz carrier is multiplied by a stack of three sines tuned to the
//! first three formants of a vowel (weights 0.6 / 0.3 / 0.1). A slow
//! vibrato modulates the phase of every formant:
//!
//! ```text
//! vib(t) = depth · sin(2π · rate · t)
//! y(t)   = amp · sin(2π·110·t) · Σ wₖ · sin(2π·Fₖ·t + vib(t))
//! ```
//!
//! The formant weights sum to one, so `|y| <= amp`.

use core::f64::consts::TAU;
use core::fmt;
use core::str::FromStr;

use ambiance_core::buffer::sample_time;
use ambiance_core::{Buffer, DspError, DspResult, ParamMap, ParamReader, Source};
use serde_json::{Value, json};

use crate::{labeled, prepare, read_label};

const CARRIER_HZ: f64 = 110.0;
const FORMANT_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Vowel selecting the formant frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vowel {
    /// "a" as in father.
    #[default]
    A,
    /// "e" as in bed.
    E,
    /// "i" as in see.
    I,
    /// "o" as in law.
    O,
    /// "u" as in boot.
    U,
}

impl Vowel {
    /// All vowels in display order.
    pub const ALL: [Vowel; 5] = [Vowel::A, Vowel::E, Vowel::I, Vowel::O, Vowel::U];

    /// First three formant frequencies in Hz.
    pub fn formants(self) -> [f64; 3] {
        match self {
            Vowel::A => [730.0, 1090.0, 2440.0],
            Vowel::E => [530.0, 1840.0, 2480.0],
            Vowel::I => [270.0, 2290.0, 3010.0],
            Vowel::O => [570.0, 840.0, 2410.0],
            Vowel::U => [300.0, 870.0, 2240.0],
        }
    }

    /// Single-letter name.
    pub fn as_str(self) -> &'static str {
        match self {
            Vowel::A => "a",
            Vowel::E => "e",
            Vowel::I => "i",
            Vowel::O => "o",
            Vowel::U => "u",
        }
    }
}

impl fmt::Display for Vowel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vowel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Vowel::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| format!("unknown vowel '{s}' (expected one of a, e, i, o, u)"))
    }
}

/// Vowel-shaped voice tone.
///
/// # Parameters
///
/// | Name | Default |
/// |------|---------|
/// | `vowel` | `"a"` |
/// | `amplitude` | 0.2 |
/// | `vibrato_rate` | 5 Hz |
/// | `vibrato_depth` | 0.005 rad |
#[derive(Debug, Clone, PartialEq)]
pub struct FormantVoice {
    vowel: Vowel,
    amplitude: f32,
    vibrato_rate: f32,
    vibrato_depth: f32,
    label: Option<String>,
}

impl Default for FormantVoice {
    fn default() -> Self {
        Self::new(Vowel::A, 0.2)
    }
}

impl FormantVoice {
    /// Registry tag.
    pub const KIND: &'static str = "formant-voice";

    /// Voice on `vowel` at `amplitude` with default vibrato.
    pub fn new(vowel: Vowel, amplitude: f32) -> Self {
        Self {
            vowel,
            amplitude,
            vibrato_rate: 5.0,
            vibrato_depth: 0.005,
            label: None,
        }
    }

    /// Override the vibrato.
    pub fn with_vibrato(mut self, rate: f32, depth: f32) -> Self {
        self.vibrato_rate = rate;
        self.vibrato_depth = depth;
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
        let vowel = reader
            .string_or("vowel", "a")?
            .parse::<Vowel>()
            .map_err(|reason| DspError::invalid(Self::KIND, "vowel", reason))?;
        let amplitude = reader.f32_or("amplitude", 0.2)?;
        let vibrato_rate = reader.f32_or("vibrato_rate", 5.0)?;
        let vibrato_depth = reader.f32_or("vibrato_depth", 0.005)?;
        let label = read_label(&mut reader)?;
        reader.finish()?;
        Ok(Self {
            vowel,
            amplitude,
            vibrato_rate,
            vibrato_depth,
            label,
        })
    }

    /// Selected vowel.
    pub fn vowel(&self) -> Vowel {
        self.vowel
    }
}

impl Source for FormantVoice {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer> {
        let n = prepare(duration, sample_rate)?;
        let formants = self.vowel.formants();
        let amp = f64::from(self.amplitude);
        let rate = f64::from(self.vibrato_rate);
        let depth = f64::from(self.vibrato_depth);

        Ok((0..n)
            .map(|i| {
                let t = sample_time(i, sample_rate);
                let vibrato = depth * (TAU * rate * t).sin();
                let stack: f64 = formants
                    .iter()
                    .zip(FORMANT_WEIGHTS)
                    .map(|(f, w)| w * (TAU * f * t + vibrato).sin())
                    .sum();
                (amp * (TAU * CARRIER_HZ * t).sin() * stack) as f32
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
                "vowel": self.vowel.as_str(),
                "amplitude": self.amplitude,
                "vibrato_rate": self.vibrato_rate,
                "vibrato_depth": self.vibrato_depth,
            }),
            self.label.as_deref(),
        )
    }
}
