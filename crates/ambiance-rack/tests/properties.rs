//! Property tests for chain resolution and execution.

use std::sync::Arc;

use ambiance_core::ParamMap;
use ambiance_rack::{
    GAIN_SLUG, PluginBank, PluginChain, PluginDescriptor, PluginHost, PluginRack, PluginSlot,
    WILDCARD_STREAM,
};
use proptest::prelude::*;
use serde_json::json;

fn gain_slot(gain_db: f64) -> PluginSlot {
    let params = ParamMap::from([("gain_db".to_string(), json!(gain_db))]);
    PluginSlot::new(Arc::new(PluginDescriptor::builtin(GAIN_SLUG, "Gain")), params)
}

fn samples() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, 0..256)
}

proptest! {
    #[test]
    fn empty_chain_is_identity(input in samples()) {
        let host = PluginHost::new();
        prop_assert_eq!(host.process_chain(&PluginChain::new(), input.clone(), 44100), input);
        prop_assert!(host.recent_failures().is_empty());
    }

    #[test]
    fn unity_gain_is_identity(input in samples()) {
        let host = PluginHost::new();
        let chain = PluginChain::from_slots(vec![gain_slot(0.0), gain_slot(0.0)]);
        let out = host.process_chain(&chain, input.clone(), 44100);
        prop_assert_eq!(out.len(), input.len());
        for (x, y) in input.iter().zip(&out) {
            prop_assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn unregistered_streams_use_the_wildcard(stream in "[a-z0-9-]{1,12}", input in samples()) {
        prop_assume!(stream != "sine");

        let mut bank = PluginBank::new("A");
        bank.insert("sine", PluginChain::new());
        bank.insert(WILDCARD_STREAM, PluginChain::from_slots(vec![gain_slot(-6.0)]));
        let rack = PluginRack::from_banks(vec![bank], Arc::new(PluginHost::new()));

        let resolved = rack.resolve(&stream).map(|chain| chain.slugs());
        prop_assert_eq!(resolved, Some(vec![GAIN_SLUG.to_string()]));
        prop_assert_eq!(rack.process_stream("sine", input.clone(), 44100), input);
    }

    #[test]
    fn rack_without_chains_passes_through(stream in ".{0,16}", input in samples()) {
        let rack = PluginRack::new(Arc::new(PluginHost::new()));
        prop_assert!(rack.resolve(&stream).is_none());
        prop_assert_eq!(rack.process_stream(&stream, input.clone(), 48000), input.clone());
        prop_assert_eq!(rack.process_master(input.clone(), 48000), input);
    }
}
