//! Typed parameter extraction from `serde_json::Value` objects.
//!
//! A missing key (or `null`) yields the supplied default. A key that is present
//! with the wrong JSON type is a configuration error, reported as
//! [`PowerBoxError::ParamTypeMismatch`] so bad input fails at construction
//! instead of being silently replaced.

use crate::error::PowerBoxError;
use serde_json::Value;

/// Extracts an `f64` from `params[name]`. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, PowerBoxError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| mismatch(name, "number", v)),
    }
}

/// Extracts a `usize` from `params[name]`; only non-negative integers are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, PowerBoxError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| mismatch(name, "non-negative integer", v)),
    }
}

/// Extracts a `bool` from `params[name]`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> Result<bool, PowerBoxError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_bool().ok_or_else(|| mismatch(name, "boolean", v)),
    }
}

fn lookup<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn mismatch(name: &str, expected: &str, got: &Value) -> PowerBoxError {
    PowerBoxError::ParamTypeMismatch {
        name: name.to_owned(),
        expected: expected.to_owned(),
        got: json_type_name(got).to_owned(),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(n) if n.is_i64() && n.as_i64().is_some_and(|i| i < 0) => "negative integer",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"box_length": 2.5});
        assert!((param_f64(&params, "box_length", 1.0).unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"box_length": 10});
        assert!((param_f64(&params, "box_length", 0.0).unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "a", 3.0).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_null_value() {
        let params = json!({"a": null});
        assert!((param_f64(&params, "a", 5.0).unwrap() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "a", 7.0).unwrap() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_rejects_string() {
        let params = json!({"b": "tau"});
        let err = param_f64(&params, "b", 1.0).unwrap_err();
        assert!(matches!(
            err,
            PowerBoxError::ParamTypeMismatch { ref name, ref got, .. } if name == "b" && got == "string"
        ));
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"n": 64});
        assert_eq!(param_usize(&params, "n", 0).unwrap(), 64);
    }

    #[test]
    fn param_usize_returns_default_when_key_missing() {
        assert_eq!(param_usize(&json!({}), "dim", 2).unwrap(), 2);
    }

    #[test]
    fn param_usize_rejects_float_value() {
        let err = param_usize(&json!({"n": 2.5}), "n", 99).unwrap_err();
        assert!(matches!(
            err,
            PowerBoxError::ParamTypeMismatch { ref got, .. } if got == "float"
        ));
    }

    #[test]
    fn param_usize_rejects_negative_integer() {
        let err = param_usize(&json!({"n": -1}), "n", 5).unwrap_err();
        assert!(matches!(
            err,
            PowerBoxError::ParamTypeMismatch { ref got, .. } if got == "negative integer"
        ));
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_values() {
        assert!(param_bool(&json!({"ensure_physical": true}), "ensure_physical", false).unwrap());
        assert!(!param_bool(&json!({"ensure_physical": false}), "ensure_physical", true).unwrap());
    }

    #[test]
    fn param_bool_returns_default_when_key_missing() {
        assert!(param_bool(&json!({}), "vol_normalised_power", true).unwrap());
    }

    #[test]
    fn param_bool_rejects_integer() {
        let err = param_bool(&json!({"ensure_physical": 1}), "ensure_physical", false).unwrap_err();
        assert!(matches!(
            err,
            PowerBoxError::ParamTypeMismatch { ref expected, .. } if expected == "boolean"
        ));
    }
}
