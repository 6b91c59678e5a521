//! Aggregation session lifecycle: start, observe, finish
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use super::coerce::coerce;
use super::field_stat::FieldStat;
use super::snapshot::Snapshot;
use super::summary::{FieldSummary, FinalResult};
use crate::error::{Error, Result};
use crate::record::FieldSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, trace};

/// What the session hands downstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitMode {
    /// Forward every record unchanged; statistics are a side effect
    #[default]
    Passthrough,
    /// Swallow records and produce only the final aggregate
    StatsOnly,
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitMode::Passthrough => write!(f, "passthrough"),
            EmitMode::StatsOnly => write!(f, "stats_only"),
        }
    }
}

/// Settings fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tracked_fields: Vec<String>,
    pub emit_mode: EmitMode,
    pub byte_format: bool,
    pub live_snapshots: bool,
}

impl SessionConfig {
    /// Track `fields` in passthrough mode, raw numbers, no snapshots
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracked_fields: fields.into_iter().map(Into::into).collect(),
            emit_mode: EmitMode::default(),
            byte_format: false,
            live_snapshots: false,
        }
    }

    pub fn emit_mode(mut self, mode: EmitMode) -> Self {
        self.emit_mode = mode;
        self
    }

    pub fn byte_format(mut self, enabled: bool) -> Self {
        self.byte_format = enabled;
        self
    }

    pub fn live_snapshots(mut self, enabled: bool) -> Self {
        self.live_snapshots = enabled;
        self
    }
}

/// Result of observing one record
#[derive(Debug)]
pub struct Observation<R> {
    /// The record itself in passthrough mode, `None` in stats-only mode
    pub forwarded: Option<R>,
    /// Progress snapshot, present when live snapshots are enabled
    pub snapshot: Option<Snapshot>,
}

/// Mutable state for one aggregation run.
///
/// A session is created by [`AggregationSession::start`], fed with
/// [`observe`](AggregationSession::observe) and consumed by either
/// [`finish`](AggregationSession::finish) or
/// [`cancel`](AggregationSession::cancel). Both consume `self`, so a session
/// is finalized at most once.
#[derive(Debug, Clone)]
pub struct AggregationSession {
    stats: Vec<FieldStat>,
    record_count: u64,
    emit_mode: EmitMode,
    byte_format: bool,
    live_snapshots: bool,
}

impl AggregationSession {
    /// Validate `config` and create a session with every field undefined
    pub fn start(config: SessionConfig) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut stats = Vec::with_capacity(config.tracked_fields.len());

        for raw in &config.tracked_fields {
            let name = raw.trim();
            if name.is_empty() {
                return Err(Error::InvalidField {
                    name: raw.clone(),
                    message: "field names must not be blank".to_string(),
                });
            }
            if seen.insert(name.to_string()) {
                stats.push(FieldStat::new(name));
            }
        }

        if stats.is_empty() {
            return Err(Error::Configuration {
                message: "at least one field must be tracked".to_string(),
                field: Some("tracked_fields".to_string()),
            });
        }

        debug!(
            fields = ?stats.iter().map(FieldStat::name).collect::<Vec<_>>(),
            emit_mode = %config.emit_mode,
            byte_format = config.byte_format,
            live_snapshots = config.live_snapshots,
            "Aggregation session started"
        );

        Ok(Self {
            stats,
            record_count: 0,
            emit_mode: config.emit_mode,
            byte_format: config.byte_format,
            live_snapshots: config.live_snapshots,
        })
    }

    /// Fold one record into every tracked field.
    ///
    /// Fields are evaluated independently: a value that cannot be coerced is
    /// counted as skipped for that field only. The record count always grows
    /// by exactly one.
    pub fn observe<R: FieldSource>(&mut self, record: R) -> Observation<R> {
        for stat in &mut self.stats {
            match coerce(record.field(stat.name())) {
                Ok(value) => stat.record(value),
                Err(reason) => {
                    trace!(field = stat.name(), %reason, "Skipping field value");
                    stat.skip();
                }
            }
        }
        self.record_count += 1;

        let snapshot = self.live_snapshots.then(|| self.snapshot());
        let forwarded = match self.emit_mode {
            EmitMode::Passthrough => Some(record),
            EmitMode::StatsOnly => None,
        };

        Observation {
            forwarded,
            snapshot,
        }
    }

    /// Current progress, regardless of whether live snapshots are enabled
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.record_count, &self.stats, self.byte_format)
    }

    pub fn stats(&self) -> &[FieldStat] {
        &self.stats
    }

    pub fn stat(&self, name: &str) -> Option<&FieldStat> {
        self.stats.iter().find(|s| s.name() == name)
    }

    pub fn tracked_fields(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(FieldStat::name)
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    pub fn emit_mode(&self) -> EmitMode {
        self.emit_mode
    }

    pub fn byte_format(&self) -> bool {
        self.byte_format
    }

    /// Whether any tracked field has evaluated at least one value
    pub fn has_data(&self) -> bool {
        self.stats.iter().any(FieldStat::has_data)
    }

    /// Finalize after the input ended normally
    pub fn finish(self) -> FinalResult {
        self.finalize()
    }

    /// Finalize after upstream stopped early. Partial results are valid.
    pub fn cancel(self) -> FinalResult {
        info!(
            records = self.record_count,
            "Pipeline stopped before end of input, finalizing with partial results"
        );
        self.finalize()
    }

    fn finalize(self) -> FinalResult {
        let result = match self.emit_mode {
            EmitMode::Passthrough => FinalResult::Forwarded {
                record_count: self.record_count,
            },
            EmitMode::StatsOnly if !self.has_data() => {
                FinalResult::RecordCount(self.record_count)
            }
            EmitMode::StatsOnly => FinalResult::Fields(
                self.stats
                    .iter()
                    .map(|stat| FieldSummary::from_stat(stat, self.byte_format))
                    .collect(),
            ),
        };

        debug!(
            records = self.record_count,
            has_data = self.has_data(),
            "Aggregation session finalized"
        );
        result
    }
}
