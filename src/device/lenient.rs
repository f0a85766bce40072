//! Forgiving field decoders for device payloads.
//!
//! Firmware versions disagree on field types (`"enabled": "1"` vs `true`,
//! missing counters, `null` strings). These helpers take whatever is there and
//! fall back to a default instead of failing the whole response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Boolean from a bool, a non-zero number, or `1/true/on/yes`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Serde adapter for [`to_bool`].
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(to_bool(&value))
}

/// Finite number, or `None` for anything else.
pub fn finite_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|f| f.is_finite()))
}

/// Integer count; non-numbers become `None`.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// String, with `null` and non-strings mapped to empty.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}
