//! Pipestat Core - single-pass running statistics over streamed records
//!
//! This crate provides the aggregation engine behind the `pipestat` CLI. A
//! session tracks a set of named numeric fields across a stream of records
//! and reports running sums, averages and extrema.
//!
//! # Main Components
//!
//! - **Aggregator**: session lifecycle, per-field statistics, snapshots and
//!   final results, plus a cooperative driver with cancellation
//! - **Record projection**: the [`FieldSource`] trait for looking up values
//! - **Formatting**: byte-magnitude rendering of statistics
//! - **Error Handling**: error types using `thiserror`
//!
//! # Example
//!
//! ```
//! use pipestat_core::{drive, AggregationSession, CancelToken, SessionConfig};
//! use serde_json::json;
//!
//! let session = AggregationSession::start(SessionConfig::new(["Length"]))?;
//! let records = vec![json!({"Length": 1024}), json!({"Length": 2048})];
//!
//! let mut forwarded = Vec::new();
//! let completion = drive(session, records.clone(), &CancelToken::new(), &mut forwarded);
//!
//! assert_eq!(forwarded, records);
//! assert_eq!(completion.record_count, 2);
//! assert!(!completion.cancelled);
//! # Ok::<(), pipestat_core::Error>(())
//! ```
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

pub mod aggregator;
pub mod error;
pub mod format;
pub mod record;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use aggregator::{
    drive, AggregationSession, CancelToken, Completion, EmitMode, FieldStat, FieldSummary,
    FinalResult, Observation, SessionConfig, Sink, Snapshot,
};
pub use error::{CoercionError, Error, Result, ValueKind};
pub use format::{format_bytes, Metric};
pub use record::FieldSource;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_empty_configuration_rejected() {
        let err = AggregationSession::start(SessionConfig::new(Vec::<String>::new())).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_emit_mode_default() {
        assert_eq!(EmitMode::default(), EmitMode::Passthrough);
        assert_ne!(EmitMode::Passthrough, EmitMode::StatsOnly);
    }
}
