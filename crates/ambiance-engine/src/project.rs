//! JSON project files.
//!
//! ```json
//! {
//!   "sample_rate": 48000,
//!   "duration": 5.0,
//!   "sources": [ { "type": "sine", "frequency": 432, "amplitude": 0.2 } ],
//!   "effects": [ { "type": "reverb", "decay": 0.6 } ],
//!   "plugins": { "banks": { "A": { "streams": {} } } }
//! }
//! ```
//!
//! Component entries are tagged by `"type"` (or `"name"`); every other key is
//! a constructor parameter.

use std::path::Path;

use ambiance_core::ParamMap;
use ambiance_rack::RackConfig;
use ambiance_registry::Registry;
use serde::{Deserialize, Serialize};

use crate::engine::AudioEngine;
use crate::error::{EngineError, EngineResult};
use crate::snapshot::EngineSnapshot;

/// Sample rate used when a project does not name one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

/// One source or effect entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Registry tag.
    #[serde(rename = "type", alias = "name")]
    pub kind: String,
    /// Constructor parameters.
    #[serde(flatten)]
    pub params: ParamMap,
}

impl ComponentConfig {
    /// Entry for `kind` with no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: ParamMap::new(),
        }
    }

    /// Add a parameter.
    pub fn param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// A complete render description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Render sample rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Default render length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Sources in order.
    #[serde(default)]
    pub sources: Vec<ComponentConfig>,
    /// Effects in order.
    #[serde(default)]
    pub effects: Vec<ComponentConfig>,
    /// Plugin rack, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<RackConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: None,
            sources: Vec::new(),
            effects: Vec::new(),
            plugins: None,
        }
    }
}

impl ProjectConfig {
    /// Load a project from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::read_file(path, e))?;
        serde_json::from_str(&text).map_err(|e| EngineError::json(path, e))
    }

    /// The built-in ambience: a 432 Hz drone, soft noise, the string
    /// resonator and an "o" voice through reverb, delay and a lowpass.
    pub fn default_ambience() -> Self {
        Self {
            sources: vec![
                ComponentConfig::new("sine")
                    .param("frequency", 432.0)
                    .param("amplitude", 0.2),
                ComponentConfig::new("noise").param("amplitude", 0.05),
                ComponentConfig::new("resonator"),
                ComponentConfig::new("formant-voice")
                    .param("vowel", "o")
                    .param("amplitude", 0.15),
            ],
            effects: vec![
                ComponentConfig::new("reverb"),
                ComponentConfig::new("delay")
                    .param("time", 0.35)
                    .param("feedback", 0.25),
                ComponentConfig::new("lowpass").param("cutoff", 5500.0),
            ],
            ..Self::default()
        }
    }

    /// Build an engine with this project's sources and effects. The rack is
    /// not attached; it needs a plugin library.
    pub fn build_engine(&self, registry: &Registry) -> EngineResult<AudioEngine> {
        let mut engine = AudioEngine::new(self.sample_rate)?;
        for entry in &self.sources {
            engine.add_source(registry.create_source(&entry.kind, &entry.params)?);
        }
        for entry in &self.effects {
            engine.add_effect(registry.create_effect(&entry.kind, &entry.params)?);
        }
        tracing::debug!(
            sources = engine.source_count(),
            effects = engine.effect_count(),
            sample_rate = self.sample_rate,
            "engine built from project"
        );
        Ok(engine)
    }
}

impl TryFrom<EngineSnapshot> for ProjectConfig {
    type Error = serde_json::Error;

    fn try_from(snapshot: EngineSnapshot) -> Result<Self, Self::Error> {
        let components = |values: Vec<serde_json::Value>| {
            values
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<ComponentConfig>, _>>()
        };
        Ok(Self {
            sample_rate: snapshot.sample_rate,
            duration: None,
            sources: components(snapshot.sources)?,
            effects: components(snapshot.effects)?,
            plugins: snapshot.plugins,
        })
    }
}
