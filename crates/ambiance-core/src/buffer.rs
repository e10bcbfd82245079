//! Mono sample buffers.
//!
//! A [`Buffer`] is a plain `Vec<f32>`. The sample rate is never stored on the
//! buffer; it travels alongside it through every `generate`/`apply`/`process`
//! call in the pipeline.

/// An ordered, fixed-length run of mono samples.
pub type Buffer = Vec<f32>;

/// Number of samples covering `duration` seconds at `sample_rate`.
///
/// Rounds to the nearest sample: `round(duration * sample_rate)`.
///
/// # Example
///
/// ```rust
/// use ambiance_core::buffer::sample_count;
///
/// assert_eq!(sample_count(0.05, 48000), 2400);
/// assert_eq!(sample_count(1.5, 22050), 33075);
/// ```
#[inline]
pub fn sample_count(duration: f64, sample_rate: u32) -> usize {
    (duration * f64::from(sample_rate)).round().max(0.0) as usize
}

/// Time in seconds of sample `index` at `sample_rate`.
#[inline]
pub fn sample_time(index: usize, sample_rate: u32) -> f64 {
    index as f64 / f64::from(sample_rate)
}

/// Peak absolute amplitude of a buffer (0.0 for an empty buffer).
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Returns true if every sample is finite (no NaN or infinity).
pub fn is_finite(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

/// Scale every sample by `factor` in place.
pub fn scale(samples: &mut [f32], factor: f32) {
    for sample in samples.iter_mut() {
        *sample *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_rounds() {
        assert_eq!(sample_count(1.0, 44100), 44100);
        assert_eq!(sample_count(0.00001, 48000), 0);
        // 0.1 * 44100 = 4410.000000000001
        assert_eq!(sample_count(0.1, 44100), 4410);
        // 1/3 s at 10 Hz rounds 3.33 down, 2/3 s rounds 6.67 up
        assert_eq!(sample_count(1.0 / 3.0, 10), 3);
        assert_eq!(sample_count(2.0 / 3.0, 10), 7);
    }

    #[test]
    fn peak_of_empty_is_zero() {
        assert_eq!(peak(&[]), 0.0);
    }

    #[test]
    fn peak_uses_absolute_value() {
        assert_eq!(peak(&[0.2, -0.9, 0.5]), 0.9);
    }

    #[test]
    fn finite_check() {
        assert!(is_finite(&[0.0, 1.0, -1.0]));
        assert!(!is_finite(&[0.0, f32::NAN]));
        assert!(!is_finite(&[f32::INFINITY]));
    }

    #[test]
    fn scale_in_place() {
        let mut buf = vec![1.0, -0.5];
        scale(&mut buf, 0.5);
        assert_eq!(buf, vec![0.5, -0.25]);
    }
}
