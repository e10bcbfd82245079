//! Mathematical utility functions for DSP.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Clipping
//!
//! - [`hard_clip`] - Last-resort clamp used inside individual effects. Mixing
//!   never clips; it rescales (see the engine's mixer).
//!
//! # Utilities
//!
//! - [`wet_dry_mix`] - Linear crossfade between dry and wet signal

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use ambiance_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(6.0) - 1.9953).abs() < 0.001);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Convert linear gain to decibels.
///
/// Values at or below zero return -200 dB rather than negative infinity.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return -200.0;
    }
    20.0 * linear.log10()
}

/// Hard clipping at `threshold`.
///
/// Harsh, buzzy character with many odd harmonics.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Linear wet/dry crossfade. `mix` = 0 is fully dry, 1 fully wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversion() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.1) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_db_roundtrip() {
        for db in [-40.0f32, -6.0, 0.0, 3.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn test_linear_to_db_silence() {
        assert_eq!(linear_to_db(0.0), -200.0);
        assert_eq!(linear_to_db(-1.0), -200.0);
    }

    #[test]
    fn test_hard_clip() {
        assert_eq!(hard_clip(0.5, 1.0), 0.5);
        assert_eq!(hard_clip(1.5, 1.0), 1.0);
        assert_eq!(hard_clip(-1.5, 0.8), -0.8);
    }

    #[test]
    fn test_wet_dry_mix() {
        assert_eq!(wet_dry_mix(1.0, 0.0, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, 0.0, 1.0), 0.0);
        assert_eq!(wet_dry_mix(1.0, 0.0, 0.25), 0.75);
    }
}
