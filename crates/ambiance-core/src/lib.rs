//! Ambiance Core - shared contracts for offline procedural audio
//!
//! This crate holds the vocabulary every other ambiance crate speaks: mono
//! sample buffers, the source and effect contracts, constructor parameters,
//! and the handful of DSP kernels reused across effects and processors.
//!
//! # Core Abstractions
//!
//! ## Buffers
//!
//! - [`Buffer`] - A `Vec<f32>` of mono samples. The sample rate travels
//!   alongside it, never inside it.
//!
//! ## Signal Contracts
//!
//! - [`Source`] - Generates `duration` seconds of audio at a sample rate
//! - [`Effect`] - Buffer-to-buffer transform with optional persistent state
//! - [`EffectExt`] / [`Chain`] - Static composition of two effects
//!
//! ## Parameters
//!
//! - [`ParamMap`] - JSON parameter overrides keyed by name
//! - [`ParamReader`] - Strict reader that rejects unknown keys
//!
//! ## Filters
//!
//! - [`OnePoleLowpass`] / [`OnePoleHighpass`] - RC filters with state that
//!   persists across buffers
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`hard_clip`], [`wet_dry_mix`]
//!
//! # Example
//!
//! ```rust
//! use ambiance_core::{Buffer, DspResult, Effect, EffectExt};
//!
//! struct Scale(f32);
//!
//! impl Effect for Scale {
//!     fn kind(&self) -> &'static str {
//!         "scale"
//!     }
//!
//!     fn apply(&mut self, mut buffer: Buffer, _sample_rate: u32) -> DspResult<Buffer> {
//!         buffer.iter_mut().for_each(|s| *s *= self.0);
//!         Ok(buffer)
//!     }
//! }
//!
//! let mut chain = Scale(0.5).chain(Scale(4.0));
//! assert_eq!(chain.apply(vec![1.0, -0.5], 44100).unwrap(), vec![2.0, -1.0]);
//! ```

pub mod buffer;
pub mod effect;
pub mod error;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod source;

pub use buffer::Buffer;
pub use effect::{Chain, Effect, EffectExt};
pub use error::{DspError, DspResult, validate_duration, validate_sample_rate};
pub use math::{db_to_linear, hard_clip, linear_to_db, wet_dry_mix};
pub use one_pole::{OnePoleHighpass, OnePoleLowpass};
pub use param::{ParamMap, ParamReader, parse_param_value, require_positive, require_range};
pub use source::Source;
