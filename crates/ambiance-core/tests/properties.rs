//! Property-based tests for ambiance-core primitives.

use ambiance_core::buffer::{peak, sample_count};
use ambiance_core::{OnePoleHighpass, OnePoleLowpass, db_to_linear, linear_to_db};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// One-pole filters stay finite and bounded for bounded input.
    #[test]
    fn one_pole_stability(
        cutoff in 20.0f32..20000.0f32,
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..512),
    ) {
        let mut lp = OnePoleLowpass::new(48000, cutoff);
        let mut hp = OnePoleHighpass::new(48000, cutoff);

        let mut low = input.clone();
        let mut high = input;
        lp.process_buffer(&mut low);
        hp.process_buffer(&mut high);

        prop_assert!(peak(&low) <= 1.0 + 1e-5, "lowpass overshoot {}", peak(&low));
        prop_assert!(high.iter().all(|s| s.is_finite() && s.abs() <= 2.0 + 1e-5));
    }

    /// Sample count always rounds to the nearest sample.
    #[test]
    fn sample_count_is_nearest(duration in 0.001f64..30.0, sample_rate in 1u32..192_000) {
        let n = sample_count(duration, sample_rate);
        let exact = duration * f64::from(sample_rate);
        prop_assert!((n as f64 - exact).abs() <= 0.5 + 1e-9);
    }

    /// dB conversions invert each other across the usable range.
    #[test]
    fn db_roundtrip(db in -120.0f32..40.0f32) {
        let back = linear_to_db(db_to_linear(db));
        prop_assert!((back - db).abs() < 1e-2, "{} -> {}", db, back);
    }
}
