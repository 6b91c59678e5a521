//! Streaming aggregation of numeric fields
//!
//! This module tracks running count, sum, average, minimum and maximum for a
//! configured set of field names over a stream of heterogeneous records, in a
//! single pass and without buffering the input.
//!
//! # Examples
//!
//! ```
//! use pipestat_core::aggregator::{AggregationSession, EmitMode, FinalResult, SessionConfig};
//! use serde_json::json;
//!
//! let config = SessionConfig::new(["Size"]).emit_mode(EmitMode::StatsOnly);
//! let mut session = AggregationSession::start(config)?;
//!
//! for record in [json!({"Size": 10}), json!({"Size": "oops"}), json!({"Size": 30})] {
//!     session.observe(&record);
//! }
//! assert_eq!(session.record_count(), 3);
//!
//! let result = session.finish();
//! let size = result.field("Size").unwrap();
//! assert_eq!(size.count_skipped, 1);
//! assert_eq!(size.average.as_ref().and_then(|m| m.as_f64()), Some(20.0));
//! # Ok::<(), pipestat_core::Error>(())
//! ```
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

pub mod coerce;
pub mod driver;
pub mod field_stat;
pub mod session;
pub mod snapshot;
pub mod summary;

#[cfg(test)]
mod prop_tests;

pub use coerce::coerce;
pub use driver::{drive, CancelToken, Completion, NullSink, Sink};
pub use field_stat::FieldStat;
pub use session::{AggregationSession, EmitMode, Observation, SessionConfig};
pub use snapshot::{FieldSnapshot, Snapshot};
pub use summary::{FieldSummary, FinalResult};
