//! Field-equality predicates over arbitrary-keyed records.

use serde_json::{Map, Value};

/// One field-equality requirement: the record must carry `key` with a
/// value structurally equal to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: String,
    pub value: Value,
}

impl Condition {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// True iff every condition's key is present in the record with an equal
/// value. Short-circuits on the first missing key or mismatch; an empty
/// conditions list is vacuously true.
pub fn matches(record: &Map<String, Value>, conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|cond| record.get(&cond.key).is_some_and(|value| *value == cond.value))
}

/// Human-readable rendering of a conditions list for diagnostics.
pub fn describe(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(|cond| format!("{}={}", cond.key, cond.value))
        .collect::<Vec<_>>()
        .join(", ")
}
