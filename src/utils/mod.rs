//! Utility functions and helpers.
//!
//! Arr listing payloads are loosely typed: ids show up as integers, floats or
//! numeric strings depending on the application and version. The helpers here
//! coerce those values without failing.

use chrono::Utc;
use serde_json::Value;

/// Ordered list of JSON paths; the first one that resolves wins.
pub type FieldPaths = &'static [&'static [&'static str]];

/// Current time as fractional unix seconds.
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Walk a nested object path such as `["movie", "id"]`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.get(*segment))
}

/// Convert a JSON value to an integer when possible.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert a JSON value to a float when possible.
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First non-zero integer id found along `paths`, evaluated left to right.
///
/// Zero is treated as absent so keys match the ones already stored in
/// existing ledgers.
pub fn first_id(record: &Value, paths: FieldPaths) -> Option<i64> {
    paths
        .iter()
        .filter_map(|path| lookup(record, path).and_then(as_int))
        .find(|id| *id != 0)
}

/// First non-empty string found along `paths`.
pub fn first_text<'a>(record: &'a Value, paths: FieldPaths) -> Option<&'a str> {
    paths
        .iter()
        .filter_map(|path| lookup(record, path).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}
