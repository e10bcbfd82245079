//! Engine configuration snapshots.

use ambiance_rack::RackConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an engine is made of, as plain data.
///
/// Serializes to
/// `{"sample_rate": int, "sources": [...], "effects": [...], "plugins": rack-or-null}`.
/// Component entries carry a `"type"` tag plus their parameters, so a snapshot
/// loads back as a [`ProjectConfig`](crate::ProjectConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Render sample rate.
    pub sample_rate: u32,
    /// Per-source configuration in insertion order.
    pub sources: Vec<Value>,
    /// Per-effect configuration in insertion order.
    pub effects: Vec<Value>,
    /// Attached rack configuration, if any.
    pub plugins: Option<RackConfig>,
}

impl EngineSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
