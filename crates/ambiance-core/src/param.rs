//! Constructor parameters for sources, effects, and processors.
//!
//! Components are configured from a [`ParamMap`] (the `params` object of a
//! JSON config). Construction is strict: a [`ParamReader`] hands out the keys a
//! component knows, and [`ParamReader::finish`] rejects anything left over so
//! a typo like `"gain_bd"` fails loudly instead of being ignored.
//!
//! # Example
//!
//! ```rust
//! use ambiance_core::{ParamMap, ParamReader};
//! use serde_json::json;
//!
//! let mut params = ParamMap::new();
//! params.insert("cutoff".into(), json!("1.2kHz"));
//!
//! let mut reader = ParamReader::new("lowpass", &params);
//! let cutoff = reader.f32_or("cutoff", 2000.0).unwrap();
//! reader.finish().unwrap();
//! assert_eq!(cutoff, 1200.0);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::{DspError, DspResult};

/// Parameter overrides keyed by name.
pub type ParamMap = BTreeMap<String, Value>;

/// Strict, consuming view over a [`ParamMap`].
pub struct ParamReader<'a> {
    owner: &'a str,
    params: &'a ParamMap,
    consumed: BTreeSet<&'a str>,
}

impl<'a> ParamReader<'a> {
    /// Create a reader for the component named `owner`.
    pub fn new(owner: &'a str, params: &'a ParamMap) -> Self {
        Self {
            owner,
            params,
            consumed: BTreeSet::new(),
        }
    }

    fn take(&mut self, key: &str) -> Option<(&'a str, &'a Value)> {
        let params: &'a ParamMap = self.params;
        let (name, value) = params.get_key_value(key)?;
        self.consumed.insert(name.as_str());
        Some((name.as_str(), value))
    }

    /// Read an optional float parameter.
    ///
    /// Accepts JSON numbers or strings understood by [`parse_param_value`].
    /// `null` counts as absent.
    pub fn f32_opt(&mut self, key: &str) -> DspResult<Option<f32>> {
        let Some((name, value)) = self.take(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Null => return Ok(None),
            Value::Number(n) => n.as_f64().map(|v| v as f32),
            Value::String(s) => parse_param_value(s),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() => Ok(Some(v)),
            Some(_) => Err(DspError::invalid(self.owner, name, "value must be finite")),
            None => Err(DspError::invalid(
                self.owner,
                name,
                format!("expected a number, got {value}"),
            )),
        }
    }

    /// Read a float parameter, falling back to `default` when absent.
    pub fn f32_or(&mut self, key: &str, default: f32) -> DspResult<f32> {
        Ok(self.f32_opt(key)?.unwrap_or(default))
    }

    /// Read a float parameter that must be present.
    pub fn f32_required(&mut self, key: &str) -> DspResult<f32> {
        self.f32_opt(key)?.ok_or_else(|| DspError::MissingParameter {
            owner: self.owner.to_string(),
            param: key.to_string(),
        })
    }

    /// Read an optional unsigned integer parameter (e.g. an RNG seed).
    pub fn u64_opt(&mut self, key: &str) -> DspResult<Option<u64>> {
        let Some((name, value)) = self.take(key) else {
            return Ok(None);
        };
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n.as_u64().map(Some).ok_or_else(|| {
                DspError::invalid(self.owner, name, "expected a non-negative integer")
            }),
            Value::String(s) => s.trim().parse::<u64>().map(Some).map_err(|_| {
                DspError::invalid(self.owner, name, "expected a non-negative integer")
            }),
            _ => Err(DspError::invalid(
                self.owner,
                name,
                "expected a non-negative integer",
            )),
        }
    }

    /// Read an optional string parameter.
    pub fn string_opt(&mut self, key: &str) -> DspResult<Option<String>> {
        let Some((name, value)) = self.take(key) else {
            return Ok(None);
        };
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(DspError::invalid(
                self.owner,
                name,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Read a string parameter, falling back to `default` when absent.
    pub fn string_or(&mut self, key: &str, default: &str) -> DspResult<String> {
        Ok(self.string_opt(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Finish reading, rejecting any parameter that was never consumed.
    pub fn finish(self) -> DspResult<()> {
        match self
            .params
            .keys()
            .find(|key| !self.consumed.contains(key.as_str()))
        {
            Some(unknown) => Err(DspError::UnknownParameter {
                owner: self.owner.to_string(),
                param: unknown.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Require `value` to be strictly positive.
pub fn require_positive(owner: &str, param: &str, value: f32) -> DspResult<f32> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(DspError::invalid(owner, param, format!("{value} must be > 0")))
    }
}

/// Require `value` to lie in `min..=max`.
pub fn require_range(owner: &str, param: &str, value: f32, min: f32, max: f32) -> DspResult<f32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(DspError::invalid(
            owner,
            param,
            format!("{value} out of range [{min}, {max}]"),
        ))
    }
}

/// Parse a parameter value string into an f32.
///
/// Supports various formats:
/// - Plain numbers: "0.5", "1.2", "-0.3"
/// - Percentages: "50%", "120%" (divided by 100)
/// - Decibels: "-6dB", "+3dB" (unit stripped; stays in dB for `*_db` parameters)
/// - Time in ms: "100ms" (converted to seconds)
/// - Time in s: "1.5s" (kept as seconds)
/// - Frequency in Hz: "440Hz"
/// - Frequency in kHz: "1.2kHz" (converted to Hz)
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }

    if let Some(db) = value
        .strip_suffix("dB")
        .or_else(|| value.strip_suffix("db"))
    {
        return db.trim().parse::<f32>().ok();
    }

    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse::<f32>().ok().map(|v| v / 1000.0);
    }

    if let Some(s) = value.strip_suffix('s') {
        return s.trim().parse::<f32>().ok();
    }

    if let Some(khz) = value
        .strip_suffix("kHz")
        .or_else(|| value.strip_suffix("khz"))
    {
        return khz.trim().parse::<f32>().ok().map(|v| v * 1000.0);
    }

    if let Some(hz) = value
        .strip_suffix("Hz")
        .or_else(|| value.strip_suffix("hz"))
    {
        return hz.trim().parse::<f32>().ok();
    }

    value.parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_param_value("0.5"), Some(0.5));
        assert_eq!(parse_param_value(" -0.3 "), Some(-0.3));
        assert_eq!(parse_param_value("abc"), None);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_param_value("50%"), Some(0.5));
        assert_eq!(parse_param_value("-6dB"), Some(-6.0));
        assert_eq!(parse_param_value("+3db"), Some(3.0));
        assert_eq!(parse_param_value("250ms"), Some(0.25));
        assert_eq!(parse_param_value("1.5s"), Some(1.5));
        assert_eq!(parse_param_value("440Hz"), Some(440.0));
        assert_eq!(parse_param_value("2kHz"), Some(2000.0));
    }

    #[test]
    fn reader_defaults_when_absent() {
        let map = ParamMap::new();
        let mut reader = ParamReader::new("sine", &map);
        assert_eq!(reader.f32_or("frequency", 440.0).unwrap(), 440.0);
        assert_eq!(reader.u64_opt("seed").unwrap(), None);
        assert_eq!(reader.string_or("vowel", "a").unwrap(), "a");
        reader.finish().unwrap();
    }

    #[test]
    fn reader_accepts_numbers_and_strings() {
        let map = params(&[("frequency", json!(220)), ("amplitude", json!("50%"))]);
        let mut reader = ParamReader::new("sine", &map);
        assert_eq!(reader.f32_or("frequency", 440.0).unwrap(), 220.0);
        assert_eq!(reader.f32_or("amplitude", 0.3).unwrap(), 0.5);
        reader.finish().unwrap();
    }

    #[test]
    fn reader_rejects_unknown_keys() {
        let map = params(&[("gain_bd", json!(6.0))]);
        let mut reader = ParamReader::new("gain", &map);
        assert_eq!(reader.f32_or("gain_db", 0.0).unwrap(), 0.0);
        let err = reader.finish().unwrap_err();
        assert_eq!(
            err,
            DspError::UnknownParameter {
                owner: "gain".into(),
                param: "gain_bd".into()
            }
        );
    }

    #[test]
    fn reader_rejects_bad_values() {
        let map = params(&[("cutoff", json!(true)), ("seed", json!(-4))]);
        let mut reader = ParamReader::new("lowpass", &map);
        assert!(matches!(
            reader.f32_or("cutoff", 1.0),
            Err(DspError::InvalidParameter { .. })
        ));
        assert!(reader.u64_opt("seed").is_err());
    }

    #[test]
    fn reader_required_missing() {
        let map = ParamMap::new();
        let mut reader = ParamReader::new("external", &map);
        assert_eq!(
            reader.f32_required("mix"),
            Err(DspError::MissingParameter {
                owner: "external".into(),
                param: "mix".into()
            })
        );
    }

    #[test]
    fn null_counts_as_absent() {
        let map = params(&[("seed", Value::Null)]);
        let mut reader = ParamReader::new("noise", &map);
        assert_eq!(reader.u64_opt("seed").unwrap(), None);
        reader.finish().unwrap();
    }

    #[test]
    fn range_helpers() {
        assert!(require_positive("lowpass", "cutoff", 10.0).is_ok());
        assert!(require_positive("lowpass", "cutoff", 0.0).is_err());
        assert!(require_range("reverb", "mix", 0.5, 0.0, 1.0).is_ok());
        assert!(require_range("reverb", "mix", 1.5, 0.0, 1.0).is_err());
    }
}
