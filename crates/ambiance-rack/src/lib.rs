//! Plugin rack for ambiance.
//!
//! Streams produced by the engine can be routed through ordered chains of
//! plugins before mixdown, and the mix itself through the `master` chain.
//!
//! - [`PluginLibrary`]: durable catalog of [`PluginDescriptor`]s (built-ins
//!   plus registered or scanned native plugins).
//! - [`PluginHost`]: runs a [`PluginChain`], building built-in processors
//!   fresh per call and delegating native plugins to an [`ExternalBackend`].
//!   A failing slot is skipped, never fatal.
//! - [`PluginRack`]: named [`PluginBank`]s, one active at a time, resolved
//!   per stream as stream chain, then wildcard chain, then pass-through.
//! - [`RackConfig`]: the JSON form of a rack, with editing helpers.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ambiance_rack::{PluginHost, PluginLibrary, PluginRack, RackConfig};
//!
//! let config: RackConfig = serde_json::from_str(r#"{
//!     "banks": { "A": { "streams": {
//!         "sine": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ]
//!     } } }
//! }"#).unwrap();
//!
//! let rack = PluginRack::from_config(&config, &PluginLibrary::in_memory(), Arc::new(PluginHost::new()));
//! let out = rack.process_stream("sine", vec![0.1, 0.2], 48000);
//! assert!((out[1] / 0.2 - 1.995).abs() < 1e-3);
//! ```

pub mod builtin;
pub mod chain;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod external;
pub mod host;
pub mod library;
pub mod paths;
pub mod rack;

pub use builtin::{BuiltinProcessor, GAIN_SLUG, GainProcessor, HIGHPASS_SLUG, HighPassProcessor};
pub use chain::{MASTER_STREAM, PluginBank, PluginChain, PluginSlot, WILDCARD_STREAM};
pub use config::{BankConfig, RackConfig, SlotConfig};
pub use descriptor::{PluginDescriptor, PluginFormat, PluginKind, detect_format, slugify};
pub use error::{RackError, RackResult};
pub use external::{CommandBackend, ExternalBackend, PLUGIN_HOST_ENV};
pub use host::{PluginHost, SlotFailure};
pub use library::{PluginLibrary, RegisterOptions};
pub use rack::{DEFAULT_BANK, PluginRack, RackRoute, RackStatus};
