//! Property-based testing strategies for generating test data
//!
//! Records are built from a small field vocabulary so generated streams hit
//! tracked, untracked, missing and malformed values in the same run.

#![cfg(test)]

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Field names that generated records draw from
pub const FIELD_NAMES: [&str; 3] = ["Size", "Count", "Ignored"];

/// Finite values in a range where sums stay exact enough to compare
pub fn finite_value_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64),
        -1.0e6f64..1.0e6,
    ]
}

/// A field value that may or may not coerce to a number
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => finite_value_strategy().prop_map(Value::from),
        2 => finite_value_strategy().prop_map(|v| Value::String(v.to_string())),
        1 => "[a-z]{1,8}".prop_map(Value::String),
        1 => any::<bool>().prop_map(Value::Bool),
        1 => Just(Value::Null),
    ]
}

/// A record with any subset of [`FIELD_NAMES`]
pub fn record_strategy() -> impl Strategy<Value = Value> {
    btree_map(
        prop::sample::select(FIELD_NAMES.to_vec()),
        field_value_strategy(),
        0..=FIELD_NAMES.len(),
    )
    .prop_map(|fields| {
        let map: Map<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Value::Object(map)
    })
}

/// A stream of records
pub fn record_stream_strategy(max_len: usize) -> impl Strategy<Value = Vec<Value>> {
    vec(record_strategy(), 0..max_len)
}
