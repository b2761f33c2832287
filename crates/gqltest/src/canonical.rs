//! Canonical JSON rendering
//!
//! Two documents that are equal as JSON render to identical bytes: object
//! keys are sorted, indentation is fixed at two spaces and integral numbers
//! lose any fractional or exponent spelling (`1.0`, `1e0` and `1` all render
//! as `1`). Array order is preserved.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Number, Value};

const INDENT: &[u8] = b"  ";

/// Parse `data` and re-serialize it in canonical form
pub fn canonicalize(data: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let value: Value = serde_json::from_slice(data)?;
    canonical_value(&value)
}

/// Serialize an already parsed value in canonical form
pub fn canonical_value(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let normalized = normalize(value);
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    normalized.serialize(&mut ser)?;
    Ok(out)
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(normalize_number(n)),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (key, item) in entries {
                sorted.insert(key.clone(), normalize(item));
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    }
}

fn normalize_number(n: &Number) -> Number {
    if n.is_i64() || n.is_u64() {
        return n.clone();
    }
    // `i64::MAX as f64` and `u64::MAX as f64` round up to 2^63 and 2^64.
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Number::from(f as i64)
        }
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => Number::from(f as u64),
        _ => n.clone(),
    }
}
