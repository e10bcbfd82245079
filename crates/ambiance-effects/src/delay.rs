//! Feedforward echo with cross-render memory.

use std::collections::VecDeque;

use ambiance_core::{Buffer, DspResult, Effect, ParamMap, ParamReader, require_positive, require_range};
use serde_json::{Value, json};

/// Single-tap echo: `y[n] = x[n] + feedback · x[n - d]`, `d = round(time · sample_rate)`.
///
/// The most recent `d` input samples are kept between calls, so an echo
/// that falls past the end of one render is heard at the start of the next.
/// [`Effect::reset`] forgets them.
///
/// # Parameters
///
/// | Name | Default | Notes |
/// |------|---------|-------|
/// | `time` | 0.25 s | 0 < time ≤ 10 s |
/// | `feedback` | 0.3 | echo level |
///
/// # Example
///
/// ```rust
/// use ambiance_core::Effect;
/// use ambiance_effects::Delay;
///
/// let mut delay = Delay::new(0.002, 0.5); // 2 samples at 1 kHz
/// let first = delay.apply(vec![1.0, 0.0, 0.0, 0.0], 1000).unwrap();
/// assert_eq!(first, vec![1.0, 0.0, 0.5, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    time: f32,
    feedback: f32,
    history: VecDeque<f32>,
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(0.25, 0.3)
    }
}

impl Delay {
    /// Registry tag.
    pub const KIND: &'static str = "delay";

    /// Longest accepted delay time in seconds.
    pub const MAX_TIME: f32 = 10.0;

    /// Create a delay of `time` seconds, clamped to [`Self::MAX_TIME`].
    pub fn new(time: f32, feedback: f32) -> Self {
        Self {
            time: time.min(Self::MAX_TIME),
            feedback,
            history: VecDeque::new(),
        }
    }

    /// Build from a parameter map.
    pub fn from_params(params: &ParamMap) -> DspResult<Self> {
        let mut reader = ParamReader::new(Self::KIND, params);
        let time = require_positive(Self::KIND, "time", reader.f32_or("time", 0.25)?)?;
        let time = require_range(Self::KIND, "time", time, 0.0, Self::MAX_TIME)?;
        let feedback = reader.f32_or("feedback", 0.3)?;
        reader.finish()?;
        Ok(Self::new(time, feedback))
    }

    fn delay_samples(&self, sample_rate: u32) -> usize {
        (f64::from(self.time) * f64::from(sample_rate)).round() as usize
    }
}

impl Effect for Delay {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&mut self, buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        let d = self.delay_samples(sample_rate);
        if d == 0 {
            return Ok(buffer.iter().map(|x| x * (1.0 + self.feedback)).collect());
        }

        // Left-pad remembered input to exactly `d` samples
        let len = self.history.len();
        if len < d {
            self.history.resize(d, 0.0);
            self.history.rotate_right(d - len);
        } else {
            self.history.drain(..len - d);
        }

        let mut out = Vec::with_capacity(buffer.len());
        for &x in &buffer {
            let delayed = self.history.pop_front().unwrap_or(0.0);
            out.push(x + self.feedback * delayed);
            self.history.push_back(x);
        }
        Ok(out)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn to_config(&self) -> Value {
        json!({
            "type": Self::KIND,
            "time": self.time,
            "feedback": self.feedback,
        })
    }
}
