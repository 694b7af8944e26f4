//! Record type and the value comparisons used by the query filter.
//!
//! Records are schema-less: each one is a JSON object mapping field names to
//! arbitrary JSON values. Looking up a field that is not present yields
//! [`Value::Null`] rather than an error, so predicates over missing fields
//! still evaluate.

use serde_json::{Map, Value};

/// One scraped entry, a field-name-to-value mapping.
pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

/// Returns the value of `field`, or `null` when the record has no such field.
#[must_use]
pub fn field<'a>(record: &'a Record, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&NULL)
}

/// Compares two values for equality.
///
/// Numbers compare by numeric value so that `1` and `1.0` are equal; arrays
/// and objects compare element-wise with the same rule.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
                l == r
            } else if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
                l == r
            } else {
                l.as_f64() == r.as_f64()
            }
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, l)| r.get(key).is_some_and(|r| values_equal(l, r)))
        }
        _ => left == right,
    }
}

/// Tests whether `needle` is a member of `haystack`.
///
/// - arrays: some element equals `needle`
/// - strings: `needle` is a string occurring as a substring
/// - objects: `needle` is a string naming one of the keys
///
/// Returns `None` when the test is undefined: `haystack` is not a container
/// at all, or `needle` is not a string and `haystack` is one.
#[must_use]
pub fn is_member(needle: &Value, haystack: &Value) -> Option<bool> {
    match haystack {
        Value::Array(items) => Some(items.iter().any(|item| values_equal(needle, item))),
        Value::String(text) => needle.as_str().map(|n| text.contains(n)),
        Value::Object(map) => Some(needle.as_str().is_some_and(|n| map.contains_key(n))),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}
