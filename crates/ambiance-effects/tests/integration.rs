//! Effect pipelines driven by real sources.

use ambiance_core::buffer::peak;
use ambiance_core::{Effect, EffectExt, Source};
use ambiance_effects::{Clip, Delay, Gain, HighPass, LowPass, Reverb};
use ambiance_sources::{Noise, Sine};

const SR: u32 = 44100;

#[test]
fn gain_then_clip_differs_from_clip_then_gain() {
    let input = Sine::new(220.0, 0.8).generate(0.05, SR).unwrap();

    let mut gain_clip = Gain::new(6.0).chain(Clip::new(1.0));
    let mut clip_gain = Clip::new(1.0).chain(Gain::new(6.0));

    let a = gain_clip.apply(input.clone(), SR).unwrap();
    let b = clip_gain.apply(input, SR).unwrap();

    assert!((peak(&a) - 1.0).abs() < 1e-6);
    assert!(peak(&b) > 1.5, "clip first leaves the boosted peak, got {}", peak(&b));
    assert_ne!(a, b);
}

#[test]
fn default_ambience_tail_is_finite_and_same_length() {
    let input = Noise::new(0.1).with_seed(2).generate(0.5, SR).unwrap();
    let mut effects: Vec<Box<dyn Effect>> = vec![
        Box::new(Reverb::default()),
        Box::new(Delay::new(0.35, 0.25)),
        Box::new(LowPass::new(5500.0)),
    ];

    let mut buffer = input.clone();
    for effect in &mut effects {
        buffer = effect.apply(buffer, SR).unwrap();
    }
    assert_eq!(buffer.len(), input.len());
    assert!(buffer.iter().all(|s| s.is_finite()));
}

#[test]
fn lowpass_darkens_noise() {
    let noise = Noise::new(0.3).with_seed(4).generate(0.5, SR).unwrap();
    let filtered = LowPass::new(300.0).apply(noise.clone(), SR).unwrap();
    let energy = |b: &[f32]| b.iter().map(|s| s * s).sum::<f32>();
    assert!(energy(&filtered) < 0.2 * energy(&noise));
}

#[test]
fn highpass_keeps_treble() {
    let tone = Sine::new(8000.0, 0.5).generate(0.1, SR).unwrap();
    let out = HighPass::default().apply(tone.clone(), SR).unwrap();
    assert!((peak(&out[2000..]) - peak(&tone[2000..])).abs() < 0.01);
}

#[test]
fn configs_name_their_type() {
    let effects: Vec<Box<dyn Effect>> = vec![
        Box::new(Reverb::default()),
        Box::new(Delay::default()),
        Box::new(LowPass::default()),
        Box::new(HighPass::default()),
        Box::new(Gain::default()),
        Box::new(Clip::default()),
    ];
    let kinds: Vec<_> = effects.iter().map(|e| e.to_config()["type"].clone()).collect();
    assert_eq!(
        kinds,
        ["reverb", "delay", "lowpass", "highpass", "gain", "clip"]
    );
}
