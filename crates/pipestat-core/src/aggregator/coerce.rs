//! Conversion of arbitrary record values to `f64`
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use crate::error::{CoercionError, ValueKind};
use serde_json::Value;

/// Coerce an optional record value to a finite `f64`.
///
/// Numbers convert directly. Strings convert when their trimmed text parses
/// as a number. Every other kind, a missing value, and NaN or infinite
/// results are rejected.
pub fn coerce(value: Option<&Value>) -> Result<f64, CoercionError> {
    let value = value.ok_or(CoercionError::Missing)?;

    let number = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| CoercionError::Unparsable {
            text: n.to_string(),
        })?,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .map_err(|_| CoercionError::Unparsable {
                    text: s.clone(),
                })?
        }
        other => {
            return Err(CoercionError::NotNumeric {
                kind: ValueKind::of(other),
            })
        }
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(CoercionError::NonFinite { value: number })
    }
}
