//! Final results of an aggregation session
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use super::field_stat::FieldStat;
use crate::format::Metric;
use serde::{Deserialize, Serialize};

/// Per-field entry of a stats-only result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub name: String,
    pub sum: Metric,
    pub average: Option<Metric>,
    pub maximum: Option<Metric>,
    pub minimum: Option<Metric>,
    pub count_evaluated: u64,
    pub count_skipped: u64,
}

impl FieldSummary {
    pub(crate) fn from_stat(stat: &FieldStat, as_bytes: bool) -> Self {
        Self {
            name: stat.name().to_string(),
            sum: Metric::render(stat.sum(), as_bytes),
            average: Metric::render_opt(stat.average(), as_bytes),
            maximum: Metric::render_opt(stat.maximum(), as_bytes),
            minimum: Metric::render_opt(stat.minimum(), as_bytes),
            count_evaluated: stat.count_evaluated(),
            count_skipped: stat.count_skipped(),
        }
    }
}

/// What a session produces when it is finalized.
///
/// Serializes untagged, so a stats-only run with no numeric data becomes a
/// bare integer and a run with data becomes an array of field summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinalResult {
    /// Stats-only mode, no tracked field ever evaluated
    RecordCount(u64),
    /// Stats-only mode, one entry per tracked field in tracking order
    Fields(Vec<FieldSummary>),
    /// Passthrough mode; records were already forwarded during ingest
    Forwarded { record_count: u64 },
}

impl FinalResult {
    /// Field summaries, when the result carries any
    pub fn fields(&self) -> Option<&[FieldSummary]> {
        match self {
            FinalResult::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up the summary for a single field
    pub fn field(&self, name: &str) -> Option<&FieldSummary> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}
