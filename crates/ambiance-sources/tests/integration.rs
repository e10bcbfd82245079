//! Cross-source checks of the `Source` contract.

use ambiance_core::buffer::{is_finite, sample_count};
use ambiance_core::Source;
use ambiance_sources::{FormantVoice, Noise, Resonator, Sine, Vowel};
use proptest::prelude::*;

fn all_sources() -> Vec<Box<dyn Source>> {
    vec![
        Box::new(Sine::new(440.0, 0.3)),
        Box::new(Noise::new(0.1).with_seed(5)),
        Box::new(Resonator::new(0.25).with_seed(5)),
        Box::new(FormantVoice::new(Vowel::I, 0.2)),
    ]
}

#[test]
fn every_source_reports_its_tag() {
    let kinds: Vec<_> = all_sources().iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, ["sine", "noise", "resonator", "formant-voice"]);
    for source in all_sources() {
        assert_eq!(source.stream_id(), source.kind());
        assert_eq!(source.to_config()["type"], source.kind());
    }
}

#[test]
fn labels_override_stream_ids() {
    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(Sine::default().with_label("s")),
        Box::new(Noise::default().with_label("n")),
        Box::new(Resonator::default().with_label("r")),
        Box::new(FormantVoice::default().with_label("f")),
    ];
    let ids: Vec<_> = sources.iter().map(|s| s.stream_id().to_string()).collect();
    assert_eq!(ids, ["s", "n", "r", "f"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every source returns round(duration * sample_rate) finite samples.
    #[test]
    fn length_and_finiteness(duration in 0.001f64..0.2, sample_rate in 8000u32..96000) {
        for source in all_sources() {
            let buf = source.generate(duration, sample_rate).unwrap();
            prop_assert_eq!(buf.len(), sample_count(duration, sample_rate));
            prop_assert!(is_finite(&buf), "{} produced non-finite output", source.kind());
        }
    }
}
