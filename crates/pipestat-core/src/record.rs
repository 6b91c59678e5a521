//! Field projection for incoming records
//!
//! The aggregator never inspects record types directly. Anything that can
//! look up a JSON value by field name implements [`FieldSource`] and can be
//! observed.
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Lookup of named values on a record
pub trait FieldSource {
    /// Return the value stored under `name`, or `None` if the record has no such field
    fn field(&self, name: &str) -> Option<&Value>;
}

impl FieldSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        lookup_dotted(name, |key| self.get(key))
    }
}

/// Objects expose their keys; scalars and arrays expose nothing.
impl FieldSource for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.field(name))
    }
}

impl FieldSource for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        lookup_dotted(name, |key| self.get(key))
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

/// Walk `a.b.c` through nested objects. Exact keys containing dots win over
/// this lookup, so it only runs after a direct miss.
fn lookup_dotted<'a, F>(path: &str, root: F) -> Option<&'a Value>
where
    F: Fn(&str) -> Option<&'a Value>,
{
    if !path.contains('.') {
        return None;
    }

    let mut segments = path.split('.');
    let mut current = root(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
