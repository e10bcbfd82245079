//! Ambiance Effects - buffer effect implementations
//!
//! This crate provides the effects the render pipeline applies after mixing,
//! all built on [`ambiance_core::Effect`]:
//!
//! - [`Reverb`] - Three-tap early-reflection reverb
//! - [`Delay`] - Single-echo delay that remembers its input across renders
//! - [`LowPass`] / [`HighPass`] - One-pole filters with persistent state
//! - [`Gain`] - Level change in dB
//! - [`Clip`] - Hard saturation at a threshold
//!
//! Every effect can be built directly or from a
//! [`ParamMap`](ambiance_core::ParamMap) with `from_params`, and describes
//! itself through [`Effect::to_config`](ambiance_core::Effect::to_config).
//!
//! ## Example
//!
//! ```rust
//! use ambiance_core::{Effect, EffectExt};
//! use ambiance_effects::{Clip, Gain};
//!
//! let mut chain = Gain::new(6.0).chain(Clip::new(0.5));
//! let out = chain.apply(vec![0.1, 0.4, -0.4], 44100).unwrap();
//! assert!(out.iter().all(|s| s.abs() <= 0.5));
//! ```

pub mod delay;
pub mod filter;
pub mod level;
pub mod reverb;

pub use delay::Delay;
pub use filter::{HighPass, LowPass};
pub use level::{Clip, Gain};
pub use reverb::Reverb;
