//! Offline render pipeline.

use std::sync::Arc;

use ambiance_core::{Buffer, validate_duration, validate_sample_rate};
use ambiance_rack::PluginRack;
use ambiance_registry::{BoxedEffect, BoxedSource};

use crate::error::{EngineError, EngineResult, ensure_finite};
use crate::mix::mix;
use crate::snapshot::EngineSnapshot;

/// Renders sources through an optional plugin rack and an effect list.
///
/// One pass of [`render`](Self::render):
///
/// 1. every source generates `duration` seconds;
/// 2. each buffer goes through the rack chain for the source's stream id;
/// 3. the buffers are [`mix`]ed;
/// 4. the mix goes through the rack's `master` chain;
/// 5. effects apply in insertion order.
///
/// Effects keep their state between renders (a delay's history, a
/// lowpass's last output). The rack keeps none.
pub struct AudioEngine {
    sample_rate: u32,
    sources: Vec<BoxedSource>,
    effects: Vec<BoxedEffect>,
    rack: Option<Arc<PluginRack>>,
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("sample_rate", &self.sample_rate)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.stream_id()).collect::<Vec<_>>(),
            )
            .field(
                "effects",
                &self.effects.iter().map(|e| e.kind()).collect::<Vec<_>>(),
            )
            .field("rack", &self.rack.as_ref().map(|r| r.active_bank_name()))
            .finish()
    }
}

impl AudioEngine {
    /// Create an engine rendering at `sample_rate` Hz.
    ///
    /// # Errors
    ///
    /// Rejects a zero sample rate.
    pub fn new(sample_rate: u32) -> EngineResult<Self> {
        validate_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            sources: Vec::new(),
            effects: Vec::new(),
            rack: None,
        })
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Append a source.
    pub fn add_source(&mut self, source: BoxedSource) {
        self.sources.push(source);
    }

    /// Append an effect. Effects run in the order they were added.
    pub fn add_effect(&mut self, effect: BoxedEffect) {
        self.effects.push(effect);
    }

    /// Attach or detach a plugin rack. The rack itself is left untouched.
    pub fn set_plugin_rack(&mut self, rack: Option<Arc<PluginRack>>) {
        self.rack = rack;
    }

    /// Attached plugin rack.
    pub fn plugin_rack(&self) -> Option<&Arc<PluginRack>> {
        self.rack.as_ref()
    }

    /// Number of sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of effects.
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Reset every effect's internal state.
    pub fn reset_effects(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Render `duration` seconds.
    ///
    /// With no sources this returns a single zero sample.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive or non-finite duration. A source or effect
    /// error aborts the render and is returned as-is; so is a stage that
    /// yields non-finite samples.
    pub fn render(&mut self, duration: f64) -> EngineResult<Buffer> {
        validate_duration(duration)?;

        if self.sources.is_empty() {
            tracing::debug!("render with no sources");
            return Ok(vec![0.0]);
        }

        let sample_rate = self.sample_rate;
        let route = self.rack.as_deref().map(PluginRack::route);
        if let Some(route) = &route {
            tracing::debug!(bank = route.bank().name(), "render routed through rack");
        }

        let mut streams = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let stream = source.stream_id();
            let buffer = source
                .generate(duration, sample_rate)
                .map_err(|e| EngineError::Source {
                    name: stream.to_string(),
                    source: e,
                })?;
            ensure_finite(&buffer, || format!("source '{stream}'"))?;
            let buffer = match &route {
                Some(route) => route.process_stream(stream, buffer, sample_rate),
                None => buffer,
            };
            tracing::debug!(stream, samples = buffer.len(), "source rendered");
            streams.push(buffer);
        }

        let mut buffer = mix(&streams);
        ensure_finite(&buffer, || "mix".to_string())?;
        if let Some(route) = &route {
            buffer = route.process_master(buffer, sample_rate);
            ensure_finite(&buffer, || "rack master".to_string())?;
        }

        for effect in &mut self.effects {
            let name = effect.kind();
            buffer = effect
                .apply(buffer, sample_rate)
                .map_err(|e| EngineError::Effect {
                    name: name.to_string(),
                    source: e,
                })?;
            ensure_finite(&buffer, || format!("effect '{name}'"))?;
        }

        tracing::debug!(samples = buffer.len(), duration, sample_rate, "render complete");
        Ok(buffer)
    }

    /// Structural description of the engine for reproducibility.
    pub fn configuration(&self) -> EngineSnapshot {
        EngineSnapshot {
            sample_rate: self.sample_rate,
            sources: self.sources.iter().map(|s| s.to_config()).collect(),
            effects: self.effects.iter().map(|e| e.to_config()).collect(),
            plugins: self.rack.as_ref().map(|rack| rack.to_config()),
        }
    }
}
