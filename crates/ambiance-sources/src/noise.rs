//! Gaussian white noise.

use ambiance_core::{Buffer, DspResult, ParamMap, ParamReader, Source};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

use crate::{labeled, prepare, read_label};

/// Draw `count` standard-normal samples.
///
/// Seeded generators are reproducible across calls and platforms; `None`
/// seeds from OS entropy. Uses the Box-Muller transform, two samples per
/// pair of uniforms.
pub fn gaussian(count: usize, seed: Option<u64>) -> Vec<f32> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = Vec::with_capacity(count + 1);
    while out.len() < count {
        // u1 in (0, 1) keeps ln(u1) finite
        let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = core::f64::consts::TAU * u2;
        out.push((r * theta.cos()) as f32);
        out.push((r * theta.sin()) as f32);
    }
    out.truncate(count);
    out
}

/// White noise with standard deviation `amplitude`.
///
/// # Parameters
///
/// | Name | Default | Notes |
/// |------|---------|-------|
/// | `amplitude` | 0.1 | standard deviation, not peak |
/// | `seed` | none | fixed seed gives identical buffers every render |
#[derive(Debug, Clone, PartialEq)]
pub struct Noise {
    amplitude: f32,
    seed: Option<u64>,
    label: Option<String>,
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Noise {
    /// Registry tag.
    pub const KIND: &'static str = "noise";

    /// Unseeded noise at `amplitude`.
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude,
            seed: None,
            label: None,
        }
    }

    /// Fix the RNG seed.
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
        let amplitude = reader.f32_or("amplitude", 0.1)?;
        let seed = reader.u64_opt("seed")?;
        let label = read_label(&mut reader)?;
        reader.finish()?;
        Ok(Self {
            amplitude,
            seed,
            label,
        })
    }
}

impl Source for Noise {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn generate(&self, duration: f64, sample_rate: u32) -> DspResult<Buffer> {
        let n = prepare(duration, sample_rate)?;
        let mut buffer = gaussian(n, self.seed);
        ambiance_core::buffer::scale(&mut buffer, self.amplitude);
        Ok(buffer)
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn to_config(&self) -> Value {
        labeled(
            json!({
                "type": Self::KIND,
                "amplitude": self.amplitude,
                "seed": self.seed,
            }),
            self.label.as_deref(),
        )
    }
}
