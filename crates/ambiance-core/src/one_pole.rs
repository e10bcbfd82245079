//! One-pole RC filters.
//!
//! Both filters are the discretized RC circuit with
//! `rc = 1 / (2π · cutoff)` and `dt = 1 / sample_rate`:
//!
//! ```text
//! lowpass:  alpha = dt / (rc + dt)    y[n] = y[n-1] + alpha · (x[n] - y[n-1])
//! highpass: alpha = rc / (rc + dt)    y[n] = alpha · (y[n-1] + x[n] - x[n-1])
//! ```
//!
//! 6 dB/octave, zero latency. State starts at zero and persists across calls
//! to `process_buffer` until [`reset`](OnePoleHighpass::reset).
//!
//! # Usage
//!
//! ```rust
//! use ambiance_core::OnePoleHighpass;
//!
//! let mut hp = OnePoleHighpass::new(48000, 100.0);
//! let mut dc = vec![1.0f32; 48000];
//! hp.process_buffer(&mut dc);
//! assert!(dc[47999].abs() < 1e-3); // DC is removed
//! ```

use core::f32::consts::TAU;

fn rc_dt(sample_rate: u32, cutoff_hz: f32) -> (f32, f32) {
    let rc = 1.0 / (TAU * cutoff_hz);
    let dt = 1.0 / sample_rate as f32;
    (rc, dt)
}

/// One-pole lowpass filter.
#[derive(Debug, Clone)]
pub struct OnePoleLowpass {
    alpha: f32,
    prev_y: f32,
}

impl OnePoleLowpass {
    /// Create a lowpass at `cutoff_hz`.
    pub fn new(sample_rate: u32, cutoff_hz: f32) -> Self {
        let (rc, dt) = rc_dt(sample_rate, cutoff_hz);
        Self {
            alpha: dt / (rc + dt),
            prev_y: 0.0,
        }
    }

    /// Recompute the coefficient, keeping filter state.
    pub fn retune(&mut self, sample_rate: u32, cutoff_hz: f32) {
        let (rc, dt) = rc_dt(sample_rate, cutoff_hz);
        self.alpha = dt / (rc + dt);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.prev_y += self.alpha * (x - self.prev_y);
        self.prev_y
    }

    /// Filter a buffer in place.
    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.prev_y = 0.0;
    }
}

/// One-pole highpass filter.
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    alpha: f32,
    prev_x: f32,
    prev_y: f32,
}

impl OnePoleHighpass {
    /// Create a highpass at `cutoff_hz`.
    pub fn new(sample_rate: u32, cutoff_hz: f32) -> Self {
        let (rc, dt) = rc_dt(sample_rate, cutoff_hz);
        Self {
            alpha: rc / (rc + dt),
            prev_x: 0.0,
            prev_y: 0.0,
        }
    }

    /// Recompute the coefficient, keeping filter state.
    pub fn retune(&mut self, sample_rate: u32, cutoff_hz: f32) {
        let (rc, dt) = rc_dt(sample_rate, cutoff_hz);
        self.alpha = rc / (rc + dt);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.alpha * (self.prev_y + x - self.prev_x);
        self.prev_x = x;
        self.prev_y = y;
        y
    }

    /// Filter a buffer in place.
    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.prev_x = 0.0;
        self.prev_y = 0.0;
    }
}
