//! The plugin rack: A/B banks of per-stream chains.
//!
//! Banks are immutable once built. The active bank is an `Arc<PluginBank>`
//! behind an [`ArcSwap`], so switching is a single atomic store and a render
//! holding a [`RackRoute`] keeps seeing the bank it started with.

use std::collections::BTreeMap;
use std::sync::Arc;

use ambiance_core::Buffer;
use arc_swap::ArcSwap;
use serde::Serialize;

use crate::chain::{MASTER_STREAM, PluginBank, PluginChain, PluginSlot};
use crate::config::{BankConfig, RackConfig, SlotConfig};
use crate::host::{PluginHost, SlotFailure};
use crate::library::PluginLibrary;

/// Name of the bank a rack starts with when nothing is configured.
pub const DEFAULT_BANK: &str = "A";

/// Routes named streams through the active bank's chains.
#[derive(Debug)]
pub struct PluginRack {
    banks: BTreeMap<String, Arc<PluginBank>>,
    active: ArcSwap<PluginBank>,
    host: Arc<PluginHost>,
    notes: Vec<String>,
}

/// Introspection snapshot returned by [`PluginRack::status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RackStatus {
    /// Currently active bank.
    pub active_bank: String,
    /// Slug lists per stream, per bank.
    pub banks: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Problems found while building the rack.
    pub notes: Vec<String>,
    /// Recently skipped slots.
    pub recent_failures: Vec<SlotFailure>,
    /// Name of the external backend, if any.
    pub external_backend: Option<String>,
    /// Whether external slots can run.
    pub external_available: bool,
}

/// The bank chosen for one render, plus the host that runs it.
#[derive(Debug, Clone)]
pub struct RackRoute<'a> {
    bank: Arc<PluginBank>,
    host: &'a PluginHost,
}

impl RackRoute<'_> {
    /// Bank this route resolves against.
    pub fn bank(&self) -> &PluginBank {
        &self.bank
    }

    /// Chain that applies to `stream`, if any.
    pub fn resolve(&self, stream: &str) -> Option<&PluginChain> {
        self.bank.resolve(stream)
    }

    /// Process one stream. Unrouted streams pass through unchanged.
    pub fn process_stream(&self, stream: &str, buffer: Buffer, sample_rate: u32) -> Buffer {
        match self.resolve(stream) {
            Some(chain) => {
                tracing::debug!(bank = self.bank.name(), stream, slots = chain.len(), "routing stream");
                self.host.process_chain(chain, buffer, sample_rate)
            }
            None => buffer,
        }
    }

    /// Process the mixed signal through the `master` chain.
    pub fn process_master(&self, buffer: Buffer, sample_rate: u32) -> Buffer {
        self.process_stream(MASTER_STREAM, buffer, sample_rate)
    }
}

impl PluginRack {
    /// Rack with a single empty bank.
    pub fn new(host: Arc<PluginHost>) -> Self {
        let bank = Arc::new(PluginBank::new(DEFAULT_BANK));
        let mut banks = BTreeMap::new();
        banks.insert(DEFAULT_BANK.to_string(), Arc::clone(&bank));
        Self {
            banks,
            active: ArcSwap::new(bank),
            host,
            notes: Vec::new(),
        }
    }

    /// Rack over prebuilt banks. The first bank by name starts active; an
    /// empty list gives a single empty bank.
    pub fn from_banks(banks: Vec<PluginBank>, host: Arc<PluginHost>) -> Self {
        let banks: BTreeMap<String, Arc<PluginBank>> = banks
            .into_iter()
            .map(|bank| (bank.name().to_string(), Arc::new(bank)))
            .collect();
        match banks.values().next().cloned() {
            Some(first) => Self {
                banks,
                active: ArcSwap::new(first),
                host,
                notes: Vec::new(),
            },
            None => Self::new(host),
        }
    }

    /// Build from declarative configuration.
    ///
    /// Slugs unknown to `library` are skipped with a note rather than
    /// failing; a chain whose slugs are all unknown is registered empty.
    pub fn from_config(config: &RackConfig, library: &PluginLibrary, host: Arc<PluginHost>) -> Self {
        let mut notes = Vec::new();
        let mut banks = Vec::new();

        for (bank_name, bank_config) in &config.banks {
            let mut bank = PluginBank::new(bank_name.as_str());
            for (stream, slots) in &bank_config.streams {
                let mut chain = PluginChain::new();
                for slot in slots {
                    match library.get(&slot.slug) {
                        Some(descriptor) => chain.push(PluginSlot::new(
                            Arc::new(descriptor.clone()),
                            slot.params.clone(),
                        )),
                        None => {
                            tracing::warn!(bank = %bank_name, stream = %stream, slug = %slot.slug, "unknown plugin slug skipped");
                            notes.push(format!(
                                "bank '{bank_name}' stream '{stream}': unknown plugin '{}' skipped",
                                slot.slug
                            ));
                        }
                    }
                }
                bank.insert(stream.as_str(), chain);
            }
            banks.push(bank);
        }

        let mut rack = Self::from_banks(banks, host);

        if let Some(requested) = &config.active_bank {
            if !rack.set_active_bank(requested) {
                notes.push(format!(
                    "active bank '{requested}' not found, using '{}'",
                    rack.active_bank_name()
                ));
            }
        }
        rack.notes = notes;
        rack
    }

    /// Switch the active bank. Unknown names are ignored and return `false`.
    pub fn set_active_bank(&self, name: &str) -> bool {
        match self.banks.get(name) {
            Some(bank) => {
                self.active.store(Arc::clone(bank));
                tracing::info!(bank = name, "active bank switched");
                true
            }
            None => false,
        }
    }

    /// Switch to the next bank in name order, wrapping around. Returns the
    /// new active bank.
    pub fn toggle_bank(&self) -> String {
        let current = self.active_bank_name();
        let mut names = self.banks.keys();
        let next = match names.position(|name| *name == current) {
            Some(_) => names.next(),
            None => None,
        }
        .or_else(|| self.banks.keys().next())
        .cloned();
        match next {
            Some(next) => {
                self.set_active_bank(&next);
                next
            }
            None => current,
        }
    }

    /// Name of the active bank.
    pub fn active_bank_name(&self) -> String {
        self.active.load().name().to_string()
    }

    /// Bank names in order.
    pub fn bank_names(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(String::as_str)
    }

    /// Look up a bank by name.
    pub fn bank(&self, name: &str) -> Option<&PluginBank> {
        self.banks.get(name).map(Arc::as_ref)
    }

    /// Host that executes chains.
    pub fn host(&self) -> &PluginHost {
        &self.host
    }

    /// Notes gathered while building the rack.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Snapshot the active bank for a whole render.
    pub fn route(&self) -> RackRoute<'_> {
        RackRoute {
            bank: self.active.load_full(),
            host: &self.host,
        }
    }

    /// Chain applying to `stream` in the active bank, cloned.
    pub fn resolve(&self, stream: &str) -> Option<PluginChain> {
        self.active.load().resolve(stream).cloned()
    }

    /// Process one stream through the active bank.
    pub fn process_stream(&self, stream: &str, buffer: Buffer, sample_rate: u32) -> Buffer {
        self.route().process_stream(stream, buffer, sample_rate)
    }

    /// Process the mixed signal through the active bank's `master` chain.
    pub fn process_master(&self, buffer: Buffer, sample_rate: u32) -> Buffer {
        self.route().process_master(buffer, sample_rate)
    }

    /// Introspection snapshot.
    pub fn status(&self) -> RackStatus {
        let banks = self
            .banks
            .iter()
            .map(|(name, bank)| {
                let streams = bank
                    .streams()
                    .iter()
                    .map(|(stream, chain)| (stream.clone(), chain.slugs()))
                    .collect();
                (name.clone(), streams)
            })
            .collect();
        RackStatus {
            active_bank: self.active_bank_name(),
            banks,
            notes: self.notes.clone(),
            recent_failures: self.host.recent_failures(),
            external_backend: self.host.external_backend().map(str::to_string),
            external_available: self.host.external_available(),
        }
    }

    /// Declarative form of the rack as currently built. Skipped slugs are
    /// not included.
    pub fn to_config(&self) -> RackConfig {
        let banks = self
            .banks
            .iter()
            .map(|(name, bank)| {
                let streams = bank
                    .streams()
                    .iter()
                    .map(|(stream, chain)| {
                        let slots = chain
                            .slots()
                            .iter()
                            .map(|slot| SlotConfig::with_params(slot.slug(), slot.params.clone()))
                            .collect();
                        (stream.clone(), slots)
                    })
                    .collect();
                (name.clone(), BankConfig { streams })
            })
            .collect();
        RackConfig {
            active_bank: Some(self.active_bank_name()),
            banks,
        }
    }
}
