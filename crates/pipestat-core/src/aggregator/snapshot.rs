//! Live progress snapshots
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use super::field_stat::FieldStat;
use crate::format::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time view of one field, rendered for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub name: String,
    pub sum: Metric,
    pub average: Option<Metric>,
    pub maximum: Option<Metric>,
    pub minimum: Option<Metric>,
}

/// Progress line produced after each observed record.
///
/// Snapshots are advisory output: hosts show them on a progress display and
/// nothing downstream depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub record_count: u64,
    pub fields: Vec<FieldSnapshot>,
}

impl Snapshot {
    pub(crate) fn capture(record_count: u64, stats: &[FieldStat], as_bytes: bool) -> Self {
        let fields = stats
            .iter()
            .map(|stat| FieldSnapshot {
                name: stat.name().to_string(),
                sum: Metric::render(stat.sum(), as_bytes),
                average: Metric::render_opt(stat.average(), as_bytes),
                maximum: Metric::render_opt(stat.maximum(), as_bytes),
                minimum: Metric::render_opt(stat.minimum(), as_bytes),
            })
            .collect();

        Self {
            record_count,
            fields,
        }
    }
}

fn or_dash(metric: &Option<Metric>) -> String {
    metric
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Records: {}", self.record_count)?;
        for field in &self.fields {
            write!(
                f,
                " | {}: sum={} avg={} max={} min={}",
                field.name,
                field.sum,
                or_dash(&field.average),
                or_dash(&field.maximum),
                or_dash(&field.minimum),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_line() {
        let mut size = FieldStat::new("Size");
        size.record(10.0);
        size.record(30.0);
        let empty = FieldStat::new("Count");

        let snapshot = Snapshot::capture(3, &[size, empty], false);
        assert_eq!(
            snapshot.to_string(),
            "Records: 3 | Size: sum=40 avg=20 max=30 min=10 | Count: sum=0 avg=- max=- min=-"
        );
    }

    #[test]
    fn test_snapshot_in_bytes() {
        let mut length = FieldStat::new("Length");
        length.record(1024.0);
        length.record(2048.0);

        let snapshot = Snapshot::capture(2, &[length], true);
        assert_eq!(
            snapshot.to_string(),
            "Records: 2 | Length: sum=3 KB avg=1.5 KB max=2 KB min=1 KB"
        );
    }
}
