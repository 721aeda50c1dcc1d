//! Lenient extraction of run settings from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! These never fail; they always produce a usable value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default tick length: one frame at 60 Hz.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default number of ticks for a batch simulation.
pub const DEFAULT_TICKS: usize = 60;

/// Extracts an `f32` from `params[name]`, returning `default` if missing,
/// the wrong type, or not finite after narrowing.
///
/// Accepts JSON integers as well as floats.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Settings for a batch of simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Seconds per tick.
    pub dt: f32,
    pub ticks: usize,
    /// Whether sampled fields apply the amplitude envelope.
    pub envelope: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            ticks: DEFAULT_TICKS,
            envelope: false,
        }
    }
}

impl RunSettings {
    /// Reads `dt`, `ticks` and `envelope` from a params object, falling back
    /// to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            dt: param_f32(params, "dt", defaults.dt),
            ticks: param_usize(params, "ticks", defaults.ticks),
            envelope: param_bool(params, "envelope", defaults.envelope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f32 --

    #[test]
    fn param_f32_extracts_existing_float() {
        let params = json!({"dt": 0.25});
        assert_eq!(param_f32(&params, "dt", 1.0), 0.25);
    }

    #[test]
    fn param_f32_extracts_integer_as_float() {
        let params = json!({"dt": 2});
        assert_eq!(param_f32(&params, "dt", 0.0), 2.0);
    }

    #[test]
    fn param_f32_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert_eq!(param_f32(&params, "dt", 3.0), 3.0);
    }

    #[test]
    fn param_f32_returns_default_when_wrong_type() {
        let params = json!({"dt": "fast"});
        assert_eq!(param_f32(&params, "dt", 1.0), 1.0);
    }

    #[test]
    fn param_f32_returns_default_when_out_of_f32_range() {
        let params = json!({"dt": 1e300});
        assert_eq!(param_f32(&params, "dt", 0.5), 0.5);
    }

    #[test]
    fn param_f32_returns_default_for_non_object() {
        let params = json!("not an object");
        assert_eq!(param_f32(&params, "dt", 7.0), 7.0);
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"ticks": 42});
        assert_eq!(param_usize(&params, "ticks", 0), 42);
    }

    #[test]
    fn param_usize_returns_default_for_float_value() {
        let params = json!({"ticks": 2.5});
        assert_eq!(param_usize(&params, "ticks", 99), 99);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"ticks": -1});
        assert_eq!(param_usize(&params, "ticks", 5), 5);
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_value() {
        assert!(param_bool(&json!({"envelope": true}), "envelope", false));
        assert!(!param_bool(&json!({"envelope": false}), "envelope", true));
    }

    #[test]
    fn param_bool_returns_default_for_wrong_type() {
        let params = json!({"envelope": 1});
        assert!(!param_bool(&params, "envelope", false));
    }

    // -- RunSettings --

    #[test]
    fn run_settings_default_to_sixty_frames_at_sixty_hz() {
        let settings = RunSettings::from_json(&json!({}));
        assert_eq!(settings, RunSettings::default());
        assert_eq!(settings.ticks, 60);
        assert!((settings.dt - 1.0 / 60.0).abs() < 1e-9);
        assert!(!settings.envelope);
    }

    #[test]
    fn run_settings_take_each_key_independently() {
        let settings = RunSettings::from_json(&json!({"dt": 0.1, "ticks": "many", "envelope": true}));
        assert_eq!(settings.dt, 0.1);
        assert_eq!(settings.ticks, DEFAULT_TICKS);
        assert!(settings.envelope);
    }
}
