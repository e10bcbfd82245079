//! Source and effect registry for ambiance.
//!
//! The set of constructible components is closed: [`SourceKind`] and
//! [`EffectKind`] enumerate every known tag, and each kind maps to exactly one
//! constructor. Tags are resolved once, when a configuration is read, so a
//! misspelled `"type"` fails before any audio is rendered.
//!
//! # Features
//!
//! - **Discovery**: list all sources and effects with descriptors
//! - **Factory**: build a component from a tag and a [`ParamMap`]
//! - **Category system**: effects grouped by type (time-based, filter, ...)
//!
//! # Example
//!
//! ```rust
//! use ambiance_core::ParamMap;
//! use ambiance_registry::{EffectCategory, Registry};
//!
//! let registry = Registry::new();
//!
//! for source in registry.sources() {
//!     println!("{}: {}", source.id, source.description);
//! }
//!
//! let sine = registry.create_source("sine", &ParamMap::new()).unwrap();
//! assert_eq!(sine.kind(), "sine");
//!
//! assert_eq!(registry.effects_in_category(EffectCategory::Filter).count(), 2);
//! ```

use core::fmt;
use core::str::FromStr;

use ambiance_core::{DspError, Effect, ParamMap, Source};
use ambiance_effects::{Clip, Delay, Gain, HighPass, LowPass, Reverb};
use ambiance_sources::{FormantVoice, Noise, Resonator, Sine};
use thiserror::Error;

/// A source that can be moved to and shared with render threads.
pub type BoxedSource = Box<dyn Source + Send + Sync>;

/// An effect that can be moved to a render thread.
pub type BoxedEffect = Box<dyn Effect + Send>;

/// Errors from registry lookups and construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    /// No source is registered under this tag.
    #[error("unknown source type '{0}'")]
    UnknownSource(String),

    /// No effect is registered under this tag.
    #[error("unknown effect type '{0}'")]
    UnknownEffect(String),

    /// The constructor rejected its parameters.
    #[error("failed to build '{kind}': {source}")]
    Build {
        /// Tag being constructed.
        kind: &'static str,
        /// Underlying parameter error.
        #[source]
        source: DspError,
    },
}

/// Category of effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Delay and reverb.
    TimeBased,
    /// Lowpass and highpass filters.
    Filter,
    /// Gain stages.
    Utility,
    /// Clipping and saturation.
    Distortion,
}

impl EffectCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Filter => "Filter",
            EffectCategory::Utility => "Utility",
            EffectCategory::Distortion => "Distortion",
        }
    }
}

/// Describes a source type.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    /// Tag used in configuration (`"type"`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Accepted parameter names, `label` excluded.
    pub params: &'static [&'static str],
}

/// Describes an effect type.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDescriptor {
    /// Tag used in configuration (`"type"`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// Accepted parameter names.
    pub params: &'static [&'static str],
}

/// Every source type the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// [`Sine`]
    Sine,
    /// [`Noise`]
    Noise,
    /// [`Resonator`]
    Resonator,
    /// [`FormantVoice`]
    FormantVoice,
}

impl SourceKind {
    /// All source kinds in listing order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Sine,
        SourceKind::Noise,
        SourceKind::Resonator,
        SourceKind::FormantVoice,
    ];

    /// Configuration tag.
    pub const fn id(self) -> &'static str {
        match self {
            SourceKind::Sine => Sine::KIND,
            SourceKind::Noise => Noise::KIND,
            SourceKind::Resonator => Resonator::KIND,
            SourceKind::FormantVoice => FormantVoice::KIND,
        }
    }

    /// Static descriptor for listings.
    pub const fn descriptor(self) -> SourceDescriptor {
        match self {
            SourceKind::Sine => SourceDescriptor {
                id: Sine::KIND,
                name: "Sine",
                description: "Pure sine tone",
                params: &["frequency", "amplitude", "phase"],
            },
            SourceKind::Noise => SourceDescriptor {
                id: Noise::KIND,
                name: "Noise",
                description: "Gaussian white noise, reproducible with a seed",
                params: &["amplitude", "seed"],
            },
            SourceKind::Resonator => SourceDescriptor {
                id: Resonator::KIND,
                name: "Resonator",
                description: "Decaying plucked-string tone with a thin noise layer",
                params: &["preset", "amplitude", "seed"],
            },
            SourceKind::FormantVoice => SourceDescriptor {
                id: FormantVoice::KIND,
                name: "Formant Voice",
                description: "110 Hz carrier shaped by three vowel formants",
                params: &["vowel", "amplitude", "vibrato_rate", "vibrato_depth"],
            },
        }
    }

    /// Construct a source from parameters.
    pub fn build(self, params: &ParamMap) -> Result<BoxedSource, RegistryError> {
        let built: Result<BoxedSource, DspError> = match self {
            SourceKind::Sine => Sine::from_params(params).map(|s| Box::new(s) as BoxedSource),
            SourceKind::Noise => Noise::from_params(params).map(|s| Box::new(s) as BoxedSource),
            SourceKind::Resonator => {
                Resonator::from_params(params).map(|s| Box::new(s) as BoxedSource)
            }
            SourceKind::FormantVoice => {
                FormantVoice::from_params(params).map(|s| Box::new(s) as BoxedSource)
            }
        };
        built.map_err(|source| RegistryError::Build {
            kind: self.id(),
            source,
        })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SourceKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sine" => Ok(SourceKind::Sine),
            "noise" => Ok(SourceKind::Noise),
            "resonator" | "bundled-resonator" => Ok(SourceKind::Resonator),
            "formant-voice" | "formant" => Ok(SourceKind::FormantVoice),
            other => Err(RegistryError::UnknownSource(other.to_string())),
        }
    }
}

/// Every effect type the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`Reverb`]
    Reverb,
    /// [`Delay`]
    Delay,
    /// [`LowPass`]
    LowPass,
    /// [`HighPass`]
    HighPass,
    /// [`Gain`]
    Gain,
    /// [`Clip`]
    Clip,
}

impl EffectKind {
    /// All effect kinds in listing order.
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::LowPass,
        EffectKind::HighPass,
        EffectKind::Gain,
        EffectKind::Clip,
    ];

    /// Configuration tag.
    pub const fn id(self) -> &'static str {
        match self {
            EffectKind::Reverb => Reverb::KIND,
            EffectKind::Delay => Delay::KIND,
            EffectKind::LowPass => LowPass::KIND,
            EffectKind::HighPass => HighPass::KIND,
            EffectKind::Gain => Gain::KIND,
            EffectKind::Clip => Clip::KIND,
        }
    }

    /// Static descriptor for listings.
    pub const fn descriptor(self) -> EffectDescriptor {
        match self {
            EffectKind::Reverb => EffectDescriptor {
                id: Reverb::KIND,
                name: "Reverb",
                description: "Three-tap early reflection reverb",
                category: EffectCategory::TimeBased,
                params: &["decay", "mix"],
            },
            EffectKind::Delay => EffectDescriptor {
                id: Delay::KIND,
                name: "Delay",
                description: "Single echo that carries across renders",
                category: EffectCategory::TimeBased,
                params: &["time", "feedback"],
            },
            EffectKind::LowPass => EffectDescriptor {
                id: LowPass::KIND,
                name: "Low Pass",
                description: "One-pole lowpass with persistent state",
                category: EffectCategory::Filter,
                params: &["cutoff"],
            },
            EffectKind::HighPass => EffectDescriptor {
                id: HighPass::KIND,
                name: "High Pass",
                description: "One-pole highpass with persistent state",
                category: EffectCategory::Filter,
                params: &["cutoff"],
            },
            EffectKind::Gain => EffectDescriptor {
                id: Gain::KIND,
                name: "Gain",
                description: "Level change in decibels",
                category: EffectCategory::Utility,
                params: &["gain_db"],
            },
            EffectKind::Clip => EffectDescriptor {
                id: Clip::KIND,
                name: "Clip",
                description: "Hard saturation at a threshold",
                category: EffectCategory::Distortion,
                params: &["threshold"],
            },
        }
    }

    /// Construct an effect from parameters.
    pub fn build(self, params: &ParamMap) -> Result<BoxedEffect, RegistryError> {
        fn boxed<E: Effect + Send + 'static>(effect: E) -> BoxedEffect {
            Box::new(effect)
        }

        let built = match self {
            EffectKind::Reverb => Reverb::from_params(params).map(boxed),
            EffectKind::Delay => Delay::from_params(params).map(boxed),
            EffectKind::LowPass => LowPass::from_params(params).map(boxed),
            EffectKind::HighPass => HighPass::from_params(params).map(boxed),
            EffectKind::Gain => Gain::from_params(params).map(boxed),
            EffectKind::Clip => Clip::from_params(params).map(boxed),
        };
        built.map_err(|source| RegistryError::Build {
            kind: self.id(),
            source,
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EffectKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| RegistryError::UnknownEffect(s.to_string()))
    }
}

/// Registry of all available sources and effects.
///
/// Holds the descriptor tables so listings can be borrowed rather than
/// rebuilt on every call.
pub struct Registry {
    sources: Vec<SourceDescriptor>,
    effects: Vec<EffectDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry with every built-in source and effect.
    pub fn new() -> Self {
        Self {
            sources: SourceKind::ALL.map(SourceKind::descriptor).to_vec(),
            effects: EffectKind::ALL.map(EffectKind::descriptor).to_vec(),
        }
    }

    /// All source descriptors.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// All effect descriptors.
    pub fn effects(&self) -> &[EffectDescriptor] {
        &self.effects
    }

    /// Look up a source descriptor by tag.
    pub fn source(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|d| d.id == id)
    }

    /// Look up an effect descriptor by tag.
    pub fn effect(&self, id: &str) -> Option<&EffectDescriptor> {
        self.effects.iter().find(|d| d.id == id)
    }

    /// Effects in one category.
    pub fn effects_in_category(
        &self,
        category: EffectCategory,
    ) -> impl Iterator<Item = &EffectDescriptor> {
        self.effects.iter().filter(move |d| d.category == category)
    }

    /// Build a source by tag.
    pub fn create_source(&self, id: &str, params: &ParamMap) -> Result<BoxedSource, RegistryError> {
        id.parse::<SourceKind>()?.build(params)
    }

    /// Build an effect by tag.
    pub fn create_effect(&self, id: &str, params: &ParamMap) -> Result<BoxedEffect, RegistryError> {
        id.parse::<EffectKind>()?.build(params)
    }
}
