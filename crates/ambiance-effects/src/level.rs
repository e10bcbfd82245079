//! Level effects: gain and hard clipping.

use ambiance_core::{
    Buffer, DspResult, Effect, ParamMap, ParamReader, db_to_linear, hard_clip, require_positive,
};
use serde_json::{Value, json};

/// Gain stage: `y[n] = x[n] · 10^(gain_db / 20)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gain {
    gain_db: f32,
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Gain {
    /// Registry tag.
    pub const KIND: &'static str = "gain";

    /// Gain of `gain_db` decibels.
    pub fn new(gain_db: f32) -> Self {
        Self { gain_db }
    }

    /// Build from a parameter map (`gain_db`, default 0).
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let gain_db = reader.f32_or("gain_db", 0.0)?;
        reader.finish()?;
        Ok(Self::new(gain_db))
    }

    /// Gain in decibels.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }
}

impl Effect for Gain {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, mut buffer: Buffer, _sample_rate: u32) -> DspResult<Buffer> {
        ambiance_core::buffer::scale(&mut buffer, db_to_linear(self.gain_db));
        Ok(buffer)
    }

    fn to_config(&self) -> Value {
        json!({ "type": Self::KIND, "gain_db": self.gain_db })
    }
}

/// Hard clipper. Samples beyond `±threshold` are flattened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    threshold: f32,
}

impl Default for Clip {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Clip {
    /// Registry tag.
    pub const KIND: &'static str = "clip";

    /// Clip at `threshold` (absolute value is used).
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    /// Build from a parameter map (`threshold`, default 1.0, must be > 0).
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let threshold =
            require_positive(Self::KIND, "threshold", reader.f32_or("threshold", 1.0)?)?;
        reader.finish()?;
        Ok(Self::new(threshold))
    }
}

impl Effect for Clip {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, mut buffer: Buffer, _sample_rate: u32) -> DspResult<Buffer> {
        for sample in &mut buffer {
            *sample = hard_clip(*sample, self.threshold);
        }
        Ok(buffer)
    }

    fn to_config(&self) -> Value {
        json!({ "type": Self::KIND, "threshold": self.threshold })
    }
}
