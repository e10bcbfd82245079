//! CLI command implementations.

pub mod effects;
pub mod plugins;
pub mod rack;
pub mod render;
pub mod sources;

use std::path::PathBuf;

use ambiance_core::ParamMap;
use ambiance_rack::PluginLibrary;
use anyhow::Context;
use serde_json::Value;

/// Parse `key=value` pairs into a parameter map.
///
/// Numbers and booleans become JSON numbers and booleans; anything else
/// (`-6dB`, `1.2kHz`, `o`) stays a string for the component to interpret.
pub fn parse_params(pairs: &[String]) -> anyhow::Result<ParamMap> {
    let mut params = ParamMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid parameter '{pair}', expected key=value"))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("invalid parameter '{pair}', empty key");
        }
        params.insert(key.to_string(), parse_value(value.trim()));
    }
    Ok(params)
}

fn parse_value(value: &str) -> Value {
    if let Ok(number) = value.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(number) {
            return Value::Number(number);
        }
    }
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

/// Open the catalog at `path`, or the platform default.
pub fn open_library(path: Option<PathBuf>) -> anyhow::Result<PluginLibrary> {
    let library = match path {
        Some(path) => PluginLibrary::load(&path)
            .with_context(|| format!("failed to open plugin catalog {}", path.display()))?,
        None => PluginLibrary::open_default().context("failed to open plugin catalog")?,
    };
    Ok(library)
}
