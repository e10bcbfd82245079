//! Slots, chains and banks.

use std::collections::BTreeMap;
use std::sync::Arc;

use ambiance_core::ParamMap;

use crate::descriptor::PluginDescriptor;

/// Reserved stream name for the post-mix stage.
pub const MASTER_STREAM: &str = "master";

/// Stream key whose chain applies to any stream without its own.
pub const WILDCARD_STREAM: &str = "*";

/// One configured plugin reference within a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSlot {
    /// Resolved descriptor.
    pub descriptor: Arc<PluginDescriptor>,
    /// Parameter overrides passed to the processor.
    pub params: ParamMap,
}

impl PluginSlot {
    /// Slot for `descriptor` with `params`.
    pub fn new(descriptor: Arc<PluginDescriptor>, params: ParamMap) -> Self {
        Self { descriptor, params }
    }

    /// Slug of the referenced plugin.
    pub fn slug(&self) -> &str {
        &self.descriptor.slug
    }
}

/// Ordered list of slots applied to one stream. An empty chain is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginChain {
    slots: Vec<PluginSlot>,
}

impl PluginChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain over `slots` in order.
    pub fn from_slots(slots: Vec<PluginSlot>) -> Self {
        Self { slots }
    }

    /// Append a slot.
    pub fn push(&mut self, slot: PluginSlot) {
        self.slots.push(slot);
    }

    /// Slots in processing order.
    pub fn slots(&self) -> &[PluginSlot] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the chain has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slugs in processing order.
    pub fn slugs(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.slug().to_string()).collect()
    }
}

/// A named set of per-stream chains. Immutable once published to a rack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginBank {
    name: String,
    streams: BTreeMap<String, PluginChain>,
}

impl PluginBank {
    /// Empty bank called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            streams: BTreeMap::new(),
        }
    }

    /// Bank name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `chain` for `stream`, replacing any previous chain.
    pub fn insert(&mut self, stream: impl Into<String>, chain: PluginChain) {
        self.streams.insert(stream.into(), chain);
    }

    /// Chains keyed by stream name.
    pub fn streams(&self) -> &BTreeMap<String, PluginChain> {
        &self.streams
    }

    /// The chain that applies to `stream`: its own chain, else the wildcard
    /// chain, else none. A stream registered with an empty chain resolves to
    /// that empty chain.
    pub fn resolve(&self, stream: &str) -> Option<&PluginChain> {
        self.streams
            .get(stream)
            .or_else(|| self.streams.get(WILDCARD_STREAM))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(slug: &str) -> PluginSlot {
        PluginSlot::new(
            Arc::new(PluginDescriptor::builtin(slug, slug)),
            ParamMap::new(),
        )
    }

    #[test]
    fn resolve_prefers_stream_then_wildcard() {
        let mut bank = PluginBank::new("A");
        bank.insert("sine", PluginChain::from_slots(vec![slot("one")]));
        bank.insert(WILDCARD_STREAM, PluginChain::from_slots(vec![slot("any")]));

        assert_eq!(bank.resolve("sine").unwrap().slugs(), ["one"]);
        assert_eq!(bank.resolve("noise").unwrap().slugs(), ["any"]);
        assert_eq!(bank.resolve(MASTER_STREAM).unwrap().slugs(), ["any"]);
    }

    #[test]
    fn resolve_without_wildcard_is_none() {
        let mut bank = PluginBank::new("A");
        bank.insert("sine", PluginChain::from_slots(vec![slot("one")]));
        assert!(bank.resolve("noise").is_none());
    }

    #[test]
    fn empty_registered_chain_shadows_wildcard() {
        let mut bank = PluginBank::new("A");
        bank.insert("sine", PluginChain::new());
        bank.insert(WILDCARD_STREAM, PluginChain::from_slots(vec![slot("any")]));
        assert!(bank.resolve("sine").unwrap().is_empty());
    }
}
