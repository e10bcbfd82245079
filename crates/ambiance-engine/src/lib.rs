//! Render pipeline for ambiance.
//!
//! This crate provides:
//!
//! - **Rendering**: [`AudioEngine`] generates every source, routes each
//!   stream through an optional [`PluginRack`](ambiance_rack::PluginRack),
//!   [`mix`]es with headroom normalization, runs the rack's `master` chain
//!   and then the effects.
//! - **Projects**: [`ProjectConfig`] describes an engine in JSON and builds
//!   it through the [`Registry`](ambiance_registry::Registry).
//! - **Snapshots**: [`AudioEngine::configuration`] returns an
//!   [`EngineSnapshot`] that loads back as a project.
//! - **WAV output**: [`write_wav`] at 16, 24 or 32-bit float.
//!
//! ## Quick Start
//!
//! ```rust
//! use ambiance_engine::ProjectConfig;
//! use ambiance_registry::Registry;
//!
//! let mut engine = ProjectConfig::default_ambience().build_engine(&Registry::new())?;
//! let buffer = engine.render(0.1)?;
//! assert_eq!(buffer.len(), 4410);
//! assert!(buffer.iter().all(|s| s.abs() <= 1.0));
//! # Ok::<(), ambiance_engine::EngineError>(())
//! ```

mod engine;
mod error;
mod mix;
mod project;
mod snapshot;
mod wav;

pub use engine::AudioEngine;
pub use error::{EngineError, EngineResult};
pub use mix::mix;
pub use project::{ComponentConfig, DEFAULT_SAMPLE_RATE, ProjectConfig};
pub use snapshot::EngineSnapshot;
pub use wav::{WavSpec, read_wav, write_wav};
