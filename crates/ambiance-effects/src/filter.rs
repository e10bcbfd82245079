//! One-pole filter effects.
//!
//! Thin wrappers over the core RC kernels. The kernel is created on the
//! first `apply` and kept afterwards, so the filter output is continuous
//! across renders. A change of sample rate retunes the coefficient without
//! dropping state.

use ambiance_core::{
    Buffer, DspResult, Effect, OnePoleHighpass, OnePoleLowpass, ParamMap, ParamReader,
    require_positive,
};
use serde_json::{Value, json};

/// One-pole lowpass.
///
/// The first output sample of a fresh filter is `alpha · x[0]`.
///
/// # Parameters
///
/// | Name | Default |
/// |------|---------|
/// | `cutoff` | 2000 Hz |
#[derive(Debug, Clone)]
pub struct LowPass {
    cutoff: f32,
    kernel: Option<(u32, OnePoleLowpass)>,
}

impl Default for LowPass {
    fn default() -> Self {
        Self::new(2000.0)
    }
}

impl LowPass {
    /// Registry tag.
    pub const KIND: &'static str = "lowpass";

    /// Lowpass at `cutoff` Hz.
    pub fn new(cutoff: f32) -> Self {
        Self {
            cutoff,
            kernel: None,
        }
    }

    /// Build from a parameter map.
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let cutoff = require_positive(Self::KIND, "cutoff", reader.f32_or("cutoff", 2000.0)?)?;
        reader.finish()?;
        Ok(Self::new(cutoff))
    }

    /// Cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }
}

impl Effect for LowPass {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, mut buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        let cutoff = self.cutoff;
        let (rate, kernel) = self
            .kernel
            .get_or_insert_with(|| (sample_rate, OnePoleLowpass::new(sample_rate, cutoff)));
        if *rate != sample_rate {
            kernel.retune(sample_rate, cutoff);
            *rate = sample_rate;
        }
        kernel.process_buffer(&mut buffer);
        Ok(buffer)
    }

    fn reset(&mut self) {
        self.kernel = None;
    }

    fn to_config(&self) -> Value {
        json!({ "type": Self::KIND, "cutoff": self.cutoff })
    }
}

/// One-pole highpass.
///
/// # Parameters
///
/// | Name | Default |
/// |------|---------|
/// | `cutoff` | 80 Hz |
#[derive(Debug, Clone)]
pub struct HighPass {
    cutoff: f32,
    kernel: Option<(u32, OnePoleHighpass)>,
}

impl Default for HighPass {
    fn default() -> Self {
        Self::new(80.0)
    }
}

impl HighPass {
    /// Registry tag.
    pub const KIND: &'static str = "highpass";

    /// Highpass at `cutoff` Hz.
    pub fn new(cutoff: f32) -> Self {
        Self {
            cutoff,
            kernel: None,
        }
    }

    /// Build from a parameter map.
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let cutoff = require_positive(Self::KIND, "cutoff", reader.f32_or("cutoff", 80.0)?)?;
        reader.finish()?;
        Ok(Self::new(cutoff))
    }

    /// Cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }
}

impl Effect for HighPass {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, mut buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        let cutoff = self.cutoff;
        let (rate, kernel) = self
            .kernel
            .get_or_insert_with(|| (sample_rate, OnePoleHighpass::new(sample_rate, cutoff)));
        if *rate != sample_rate {
            kernel.retune(sample_rate, cutoff);
            *rate = sample_rate;
        }
        kernel.process_buffer(&mut buffer);
        Ok(buffer)
    }

    fn reset(&mut self) {
        self.kernel = None;
    }

    fn to_config(&self) -> Value {
        json!({ "type": Self::KIND, "cutoff": self.cutoff })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    #[test]
    fn lowpass_first_sample() {
        let rc = 1.0 / (TAU * 2000.0);
        let dt = 1.0 / 44100.0;
        let alpha = dt / (rc + dt);
        let out = LowPass::default().apply(vec![1.0, 1.0], 44100).unwrap();
        assert!((out[0] - alpha).abs() < 1e-7);
        assert!((out[1] - (alpha + alpha * (1.0 - alpha))).abs() < 1e-6);
    }

    #[test]
    fn lowpass_state_persists_across_renders() {
        let signal: Vec<f32> = (0..2000).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();

        let mut once = LowPass::new(500.0);
        let whole = once.apply(signal.clone(), 8000).unwrap();

        let mut twice = LowPass::new(500.0);
        let mut split = twice.apply(signal[..700].to_vec(), 8000).unwrap();
        split.extend(twice.apply(signal[700..].to_vec(), 8000).unwrap());

        for (a, b) in whole.iter().zip(&split) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_restarts_from_silence() {
        let mut lp = LowPass::new(100.0);
        lp.apply(vec![1.0; 1000], 8000).unwrap();
        lp.reset();
        let out = lp.apply(vec![0.0; 4], 8000).unwrap();
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn highpass_removes_dc() {
        let out = HighPass::new(100.0).apply(vec![0.5; 8000], 8000).unwrap();
        assert!(out[7999].abs() < 1e-3);
    }

    #[test]
    fn from_params_units() {
        let params: ParamMap = serde_json::from_value(json!({"cutoff": "5.5kHz"})).unwrap();
        assert_eq!(LowPass::from_params(&params).unwrap().cutoff(), 5500.0);
        let params: ParamMap = serde_json::from_value(json!({"cutoff": 0})).unwrap();
        assert!(HighPass::from_params(&params).is_err());
    }
}
