//! Integration tests for the render pipeline, plugin routing, and projects.

use std::path::Path;
use std::sync::Arc;

use ambiance_core::{Buffer, ParamMap};
use ambiance_effects::{Clip, Delay, Gain, LowPass};
use ambiance_engine::{
    AudioEngine, EngineError, ProjectConfig, WavSpec, read_wav, write_wav,
};
use ambiance_rack::{
    ExternalBackend, PluginHost, PluginLibrary, PluginRack, RackConfig, RackError, RackResult,
    RegisterOptions,
};
use ambiance_registry::Registry;
use ambiance_sources::{Noise, Sine};
use serde_json::json;
use tempfile::TempDir;

const SR: u32 = 48000;
const DURATION: f64 = 0.05;

fn rack_from(json: serde_json::Value, library: &PluginLibrary, host: PluginHost) -> Arc<PluginRack> {
    let config: RackConfig = serde_json::from_value(json).unwrap();
    Arc::new(PluginRack::from_config(&config, library, Arc::new(host)))
}

fn sine_engine() -> AudioEngine {
    let mut engine = AudioEngine::new(SR).unwrap();
    engine.add_source(Box::new(Sine::new(440.0, 0.2)));
    engine
}

/// Assert `processed[i] / baseline[i] ≈ ratio` wherever the baseline is not
/// near zero.
fn assert_ratio(baseline: &[f32], processed: &[f32], ratio: f32) {
    assert_eq!(baseline.len(), processed.len());
    let mut checked = 0;
    for (b, p) in baseline.iter().zip(processed) {
        if b.abs() > 1e-3 {
            assert!(
                (p / b - ratio).abs() < 1e-3,
                "ratio {} differs from {ratio}",
                p / b
            );
            checked += 1;
        }
    }
    assert!(checked > baseline.len() / 2);
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn render_length_is_rounded_duration() {
    let mut engine = sine_engine();
    assert_eq!(engine.render(DURATION).unwrap().len(), 2400);
    assert_eq!(engine.render(0.123_456).unwrap().len(), 5926);
}

#[test]
fn mixed_output_never_exceeds_unity() {
    let mut engine = AudioEngine::new(SR).unwrap();
    for _ in 0..8 {
        engine.add_source(Box::new(Sine::new(220.0, 0.9)));
    }
    engine.add_source(Box::new(Noise::new(0.5).with_seed(3)));
    let out = engine.render(0.1).unwrap();
    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak <= 1.0 + 1e-6);
    assert!(peak > 0.99);
}

#[test]
fn near_max_amplitudes_mix_to_finite_output() {
    let mut engine = AudioEngine::new(SR).unwrap();
    engine.add_source(Box::new(Sine::new(100.0, 3.0e38)));
    engine.add_source(Box::new(Sine::new(100.0, 3.0e38)));
    let out = engine.render(0.01).unwrap();
    assert_eq!(out.len(), 480);
    assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0 + 1e-6));
    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.99);
}

#[test]
fn effect_order_matters() {
    let render = |first_gain: bool| {
        let mut engine = AudioEngine::new(SR).unwrap();
        engine.add_source(Box::new(Sine::new(100.0, 0.9)));
        if first_gain {
            engine.add_effect(Box::new(Gain::new(6.0)));
            engine.add_effect(Box::new(Clip::new(0.5)));
        } else {
            engine.add_effect(Box::new(Clip::new(0.5)));
            engine.add_effect(Box::new(Gain::new(6.0)));
        }
        engine.render(DURATION).unwrap()
    };

    let gain_then_clip = render(true);
    let clip_then_gain = render(false);
    assert!(gain_then_clip.iter().all(|s| s.abs() <= 0.5));
    assert!(clip_then_gain.iter().any(|s| s.abs() > 0.9));
    assert_ne!(gain_then_clip, clip_then_gain);
}

#[test]
fn effects_keep_state_between_renders() {
    let mut engine = AudioEngine::new(1000).unwrap();
    engine.add_source(Box::new(Sine::new(50.0, 0.5)));
    engine.add_effect(Box::new(Delay::new(0.1, 0.5)));

    let first = engine.render(0.1).unwrap();
    let second = engine.render(0.1).unwrap();
    assert_ne!(first, second);

    engine.reset_effects();
    assert_eq!(engine.render(0.1).unwrap(), first);
}

#[test]
fn source_error_names_the_stream() {
    let project: ProjectConfig = serde_json::from_value(json!({
        "sources": [ { "type": "sine", "frequency": -5 } ]
    }))
    .unwrap();
    assert!(matches!(
        project.build_engine(&Registry::new()),
        Err(EngineError::Registry(_))
    ));
}

// ============================================================================
// Plugin routing
// ============================================================================

#[test]
fn gain_chain_scales_the_sine_stream() {
    let baseline = sine_engine().render(DURATION).unwrap();

    let mut engine = sine_engine();
    engine.set_plugin_rack(Some(rack_from(
        json!({ "banks": { "A": { "streams": {
            "sine": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ]
        } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    )));
    let processed = engine.render(DURATION).unwrap();

    assert_ratio(&baseline, &processed, 10f32.powf(6.0 / 20.0));
}

#[test]
fn rack_without_matching_chain_passes_through() {
    let baseline = sine_engine().render(DURATION).unwrap();

    let mut engine = sine_engine();
    engine.set_plugin_rack(Some(rack_from(
        json!({ "banks": { "A": { "streams": {
            "noise": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ]
        } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    )));
    assert_eq!(engine.render(DURATION).unwrap(), baseline);
}

#[test]
fn labelled_source_uses_its_own_stream() {
    let mut engine = AudioEngine::new(SR).unwrap();
    engine.add_source(Box::new(Sine::new(440.0, 0.2).with_label("lead")));
    engine.set_plugin_rack(Some(rack_from(
        json!({ "banks": { "A": { "streams": {
            "sine": [ { "slug": "builtin-gain", "params": { "gain_db": -60.0 } } ],
            "lead": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ]
        } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    )));
    let baseline = sine_engine().render(DURATION).unwrap();
    assert_ratio(&baseline, &engine.render(DURATION).unwrap(), 10f32.powf(0.3));
}

#[test]
fn master_chain_runs_before_effects() {
    let mut engine = sine_engine();
    engine.add_effect(Box::new(Clip::new(0.1)));
    engine.set_plugin_rack(Some(rack_from(
        json!({ "banks": { "A": { "streams": {
            "master": [ { "slug": "builtin-gain", "params": { "gain_db": 20.0 } } ]
        } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    )));
    let out = engine.render(DURATION).unwrap();
    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!((peak - 0.1).abs() < 1e-6);
}

#[test]
fn bank_switch_between_renders() {
    let baseline = sine_engine().render(DURATION).unwrap();
    let rack = rack_from(
        json!({
            "active_bank": "A",
            "banks": {
                "A": { "streams": { "sine": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ] } },
                "B": { "streams": { "sine": [ { "slug": "builtin-gain", "params": { "gain_db": -6.0 } } ] } }
            }
        }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    );

    let mut engine = sine_engine();
    engine.set_plugin_rack(Some(Arc::clone(&rack)));

    let a = engine.render(DURATION).unwrap();
    assert!(rack.set_active_bank("B"));
    let b = engine.render(DURATION).unwrap();
    assert!(rack.set_active_bank("A"));
    let a_again = engine.render(DURATION).unwrap();

    assert_ratio(&baseline, &a, 10f32.powf(0.3));
    assert_ratio(&baseline, &b, 10f32.powf(-0.3));
    assert_eq!(a, a_again);
}

#[test]
fn unknown_slug_renders_like_no_chain() {
    let rack = rack_from(
        json!({ "banks": { "A": { "streams": { "sine": [ { "slug": "does-not-exist" } ] } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    );
    assert!(rack.resolve("sine").unwrap().is_empty());

    let mut engine = sine_engine();
    engine.set_plugin_rack(Some(rack));
    assert_eq!(
        engine.render(DURATION).unwrap(),
        sine_engine().render(DURATION).unwrap()
    );
}

struct AlwaysFails;

impl ExternalBackend for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn process(&self, plugin: &Path, _: &ParamMap, _: &[f32], _: u32) -> RackResult<Buffer> {
        Err(RackError::external(plugin.display().to_string(), "crashed"))
    }
}

#[test]
fn failing_external_slot_does_not_break_render() {
    let dir = TempDir::new().unwrap();
    let plugin = dir.path().join("Broken.vst3");
    std::fs::write(&plugin, b"").unwrap();
    let mut library = PluginLibrary::in_memory();
    let broken = library
        .register_path(&plugin, RegisterOptions::default())
        .unwrap();

    let rack = rack_from(
        json!({ "banks": { "A": { "streams": { "sine": [
            { "slug": "builtin-gain", "params": { "gain_db": 6.0 } },
            { "slug": broken.slug },
            { "slug": "builtin-gain", "params": { "gain_db": 6.0 } }
        ] } } } }),
        &library,
        PluginHost::with_external(Arc::new(AlwaysFails)),
    );

    let mut engine = sine_engine();
    engine.set_plugin_rack(Some(Arc::clone(&rack)));
    let out = engine.render(DURATION).unwrap();

    let baseline = sine_engine().render(DURATION).unwrap();
    assert_ratio(&baseline, &out, 10f32.powf(0.6));
    assert_eq!(rack.status().recent_failures.len(), 1);
}

#[test]
fn one_rack_serves_several_engines() {
    let rack = rack_from(
        json!({ "banks": { "A": { "streams": {
            "*": [ { "slug": "builtin-highpass", "params": { "cutoff": 200 } } ]
        } } } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    );

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let rack = Arc::clone(&rack);
            std::thread::spawn(move || {
                let mut engine = sine_engine();
                engine.set_plugin_rack(Some(rack));
                engine.render(DURATION).unwrap()
            })
        })
        .collect();
    let outputs: Vec<Buffer> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

// ============================================================================
// Snapshots, projects, WAV
// ============================================================================

#[test]
fn snapshot_shape() {
    let mut engine = sine_engine();
    engine.add_effect(Box::new(LowPass::new(1000.0)));
    let snapshot = serde_json::to_value(engine.configuration()).unwrap();
    assert_eq!(snapshot["sample_rate"], SR);
    assert_eq!(snapshot["sources"][0]["type"], "sine");
    assert_eq!(snapshot["effects"][0]["type"], "lowpass");
    assert!(snapshot["plugins"].is_null());

    engine.set_plugin_rack(Some(rack_from(
        json!({ "banks": { "A": {} } }),
        &PluginLibrary::in_memory(),
        PluginHost::new(),
    )));
    let snapshot = serde_json::to_value(engine.configuration()).unwrap();
    assert_eq!(snapshot["plugins"]["active_bank"], "A");
}

#[test]
fn snapshot_reloads_as_project() {
    let registry = Registry::new();
    let mut original = ProjectConfig::default_ambience();
    original.sample_rate = 22050;
    let engine = original.build_engine(&registry).unwrap();
    let snapshot = engine.configuration();

    let project = ProjectConfig::try_from(snapshot.clone()).unwrap();
    let rebuilt = project.build_engine(&registry).unwrap();
    assert_eq!(rebuilt.configuration(), snapshot);
}

#[test]
fn project_file_renders_to_wav() {
    let dir = TempDir::new().unwrap();
    let project_path = dir.path().join("project.json");
    std::fs::write(
        &project_path,
        r#"{
            "sample_rate": 16000,
            "duration": 0.25,
            "sources": [ { "name": "sine", "frequency": "1kHz", "amplitude": 0.5 } ],
            "effects": [ { "type": "gain", "gain_db": "-6dB" } ]
        }"#,
    )
    .unwrap();

    let project = ProjectConfig::load(&project_path).unwrap();
    let mut engine = project.build_engine(&Registry::new()).unwrap();
    let buffer = engine.render(project.duration.unwrap()).unwrap();
    assert_eq!(buffer.len(), 4000);

    let wav_path = dir.path().join("out.wav");
    let spec = WavSpec {
        sample_rate: engine.sample_rate(),
        bits_per_sample: 32,
    };
    write_wav(&wav_path, &buffer, spec).unwrap();
    let (loaded, sr) = read_wav(&wav_path).unwrap();
    assert_eq!(sr, 16000);
    assert_eq!(loaded, buffer);
}

#[test]
fn malformed_project_is_json_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "[1, 2").unwrap();
    assert!(matches!(
        ProjectConfig::load(&path),
        Err(EngineError::Json { .. })
    ));
    assert!(matches!(
        ProjectConfig::load(dir.path().join("missing.json")),
        Err(EngineError::ReadFile { .. })
    ));
}
