//! Declarative rack configuration.
//!
//! ```json
//! {
//!   "active_bank": "A",
//!   "banks": {
//!     "A": { "streams": { "sine": [ { "slug": "builtin-gain", "params": { "gain_db": 6.0 } } ] } },
//!     "B": { "streams": { "*": [] } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use ambiance_core::ParamMap;
use serde::{Deserialize, Serialize};

use crate::error::{RackError, RackResult};
use crate::library::write_atomic;

/// One slot reference: a plugin slug plus parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Plugin slug, resolved through the library.
    pub slug: String,
    /// Parameter overrides.
    #[serde(default)]
    pub params: ParamMap,
}

impl SlotConfig {
    /// Slot for `slug` with no overrides.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            params: ParamMap::new(),
        }
    }

    /// Slot for `slug` with `params`.
    pub fn with_params(slug: impl Into<String>, params: ParamMap) -> Self {
        Self {
            slug: slug.into(),
            params,
        }
    }
}

/// Chains of one bank, keyed by stream name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Slot lists keyed by stream name (`"master"` and `"*"` included).
    #[serde(default)]
    pub streams: BTreeMap<String, Vec<SlotConfig>>,
}

/// Whole-rack configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RackConfig {
    /// Bank selected at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_bank: Option<String>,
    /// Banks keyed by name.
    #[serde(default)]
    pub banks: BTreeMap<String, BankConfig>,
}

impl RackConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RackResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RackError::read_file(path, e))?;
        serde_json::from_str(&text).map_err(|e| RackError::json(path, e))
    }

    /// Load from `path`, or return an empty config if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> RackResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save to a JSON file, atomically replacing any previous content.
    pub fn save(&self, path: impl AsRef<Path>) -> RackResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|e| RackError::json(path, e))?;
        write_atomic(path, &text)
    }

    /// Bank that a rack built from this config starts on: the configured
    /// one if it exists, else the first by name.
    pub fn effective_active(&self) -> Option<&str> {
        match &self.active_bank {
            Some(name) if self.banks.contains_key(name) => Some(name.as_str()),
            _ => self.banks.keys().next().map(String::as_str),
        }
    }

    /// Insert `slot` into `bank`/`stream`, creating both as needed.
    ///
    /// `position` past the end (or `None`) appends. Returns the index the
    /// slot landed at.
    pub fn assign(
        &mut self,
        bank: &str,
        stream: &str,
        slot: SlotConfig,
        position: Option<usize>,
    ) -> usize {
        let chain = self
            .banks
            .entry(bank.to_string())
            .or_default()
            .streams
            .entry(stream.to_string())
            .or_default();
        let index = position.map_or(chain.len(), |p| p.min(chain.len()));
        chain.insert(index, slot);
        index
    }

    /// Remove the slot at `index` from `bank`/`stream`.
    ///
    /// A stream left with no slots is dropped so it falls back to the
    /// wildcard again.
    pub fn remove(&mut self, bank: &str, stream: &str, index: usize) -> Option<SlotConfig> {
        let bank_config = self.banks.get_mut(bank)?;
        let chain = bank_config.streams.get_mut(stream)?;
        if index >= chain.len() {
            return None;
        }
        let removed = chain.remove(index);
        if chain.is_empty() {
            bank_config.streams.remove(stream);
        }
        Some(removed)
    }

    /// Make `bank` active. Returns `false` if no such bank exists.
    pub fn set_active(&mut self, bank: &str) -> bool {
        if !self.banks.contains_key(bank) {
            return false;
        }
        self.active_bank = Some(bank.to_string());
        true
    }

    /// Advance the active bank to the next one in name order, wrapping
    /// around. Returns the new active bank.
    pub fn toggle_active(&mut self) -> Option<&str> {
        let current = self.effective_active().map(str::to_string);
        let next = match current {
            Some(current) => self
                .banks
                .range::<String, _>((
                    std::ops::Bound::Excluded(&current),
                    std::ops::Bound::Unbounded,
                ))
                .next()
                .or_else(|| self.banks.iter().next())
                .map(|(name, _)| name.clone()),
            None => None,
        };
        self.active_bank = next;
        self.active_bank.as_deref()
    }
}
