//! Human-readable rendering of aggregate values
//!
//! Statistics are kept as plain `f64` inside the aggregator. Rendering to a
//! byte-magnitude string only happens when a snapshot or summary is built,
//! through [`Metric::render`].
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude suffixes, in powers of 1024
pub const BYTE_UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

const STEP: f64 = 1024.0;

/// Format a value as a byte magnitude, e.g. `1536.0` becomes `"1.5 KB"`.
///
/// The unit is `floor(log_1024(|value|))` clamped to [`BYTE_UNITS`]. The
/// scaled magnitude is rounded to one decimal place with ties going to the
/// even digit, so `1280.0` is `"1.2 KB"`. The sign of the input is kept. Zero is the special case `"0B"`.
pub fn format_bytes(value: f64) -> String {
    if value == 0.0 {
        return "0B".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    let mut index = 0;
    let mut scale = 1.0;
    while index < BYTE_UNITS.len() - 1 && magnitude >= scale * STEP {
        scale *= STEP;
        index += 1;
    }

    let rounded = (magnitude / scale * 10.0).round_ties_even() / 10.0;
    // -0.04 B rounds to zero; never print "-0"
    let signed = if value.is_sign_negative() && rounded != 0.0 {
        -rounded
    } else {
        rounded
    };

    format!("{} {}", signed, BYTE_UNITS[index])
}

/// A single rendered statistic: either the raw number or its byte string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Raw(f64),
    Bytes(String),
}

impl Metric {
    /// Render `value` raw, or through [`format_bytes`] when `as_bytes` is set
    pub fn render(value: f64, as_bytes: bool) -> Self {
        if as_bytes {
            Metric::Bytes(format_bytes(value))
        } else {
            Metric::Raw(value)
        }
    }

    /// Render an optional statistic, keeping `None` for undefined values
    pub fn render_opt(value: Option<f64>, as_bytes: bool) -> Option<Self> {
        value.map(|v| Self::render(v, as_bytes))
    }

    /// The raw number, if this metric was not byte-formatted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Raw(v) => Some(*v),
            Metric::Bytes(_) => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Raw(v) => write!(f, "{}", v),
            Metric::Bytes(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_special_cased() {
        assert_eq!(format_bytes(0.0), "0B");
        assert_eq!(format_bytes(-0.0), "0B");
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(1024.0), "1 KB");
        assert_eq!(format_bytes(-2048.0), "-2 KB");
    }

    #[test]
    fn test_small_values_stay_in_bytes() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1.0), "1 B");
        assert_eq!(format_bytes(0.25), "0.2 B");
        assert_eq!(format_bytes(-0.04), "0 B");
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(format_bytes(1280.0), "1.2 KB");
        assert_eq!(format_bytes(1.75 * 1024.0), "1.8 KB");
        assert_eq!(format_bytes(-1280.0), "-1.2 KB");
    }

    #[test]
    fn test_exact_powers_pick_the_larger_unit() {
        assert_eq!(format_bytes(1024.0 * 1024.0), "1 MB");
        assert_eq!(format_bytes(1024f64.powi(3)), "1 GB");
        assert_eq!(format_bytes(1.5 * 1024f64.powi(4)), "1.5 TB");
    }

    #[test]
    fn test_clamped_to_exabytes() {
        assert_eq!(format_bytes(1024f64.powi(6)), "1 EB");
        assert_eq!(format_bytes(2048.0 * 1024f64.powi(6)), "2048 EB");
    }

    #[test]
    fn test_metric_rendering() {
        assert_eq!(Metric::render(40.0, false), Metric::Raw(40.0));
        assert_eq!(
            Metric::render(1536.0, true),
            Metric::Bytes("1.5 KB".to_string())
        );
        assert_eq!(Metric::render_opt(None, true), None);
        assert_eq!(Metric::render(20.0, false).to_string(), "20");
    }

    #[test]
    fn test_metric_serializes_untagged() {
        let raw = serde_json::to_value(Metric::Raw(1.5)).unwrap();
        assert_eq!(raw, serde_json::json!(1.5));

        let bytes = serde_json::to_value(Metric::Bytes("2 KB".to_string())).unwrap();
        assert_eq!(bytes, serde_json::json!("2 KB"));
    }
}
