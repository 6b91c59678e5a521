//! Running statistics for one tracked field
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Running count, sum, average and extrema for a single field.
///
/// `average`, `minimum` and `maximum` stay `None` until the first value is
/// evaluated; the first value then sets both extrema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStat {
    name: String,
    count_evaluated: u64,
    count_skipped: u64,
    sum: f64,
    average: Option<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl FieldStat {
    /// Create an empty statistic for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count_evaluated: 0,
            count_skipped: 0,
            sum: 0.0,
            average: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Fold one successfully coerced value into the running totals
    pub fn record(&mut self, value: f64) {
        self.count_evaluated += 1;
        self.sum += value;
        self.average = Some(self.sum / self.count_evaluated as f64);
        self.minimum = Some(self.minimum.map_or(value, |min| min.min(value)));
        self.maximum = Some(self.maximum.map_or(value, |max| max.max(value)));
    }

    /// Count a record whose value for this field could not be evaluated
    pub fn skip(&mut self) {
        self.count_skipped += 1;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count_evaluated(&self) -> u64 {
        self.count_evaluated
    }

    pub fn count_skipped(&self) -> u64 {
        self.count_skipped
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    /// Whether at least one value has been evaluated
    pub fn has_data(&self) -> bool {
        self.count_evaluated > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stat_is_undefined() {
        let stat = FieldStat::new("Size");
        assert_eq!(stat.name(), "Size");
        assert_eq!(stat.sum(), 0.0);
        assert_eq!(stat.count_evaluated(), 0);
        assert_eq!(stat.average(), None);
        assert_eq!(stat.minimum(), None);
        assert_eq!(stat.maximum(), None);
        assert!(!stat.has_data());
    }

    #[test]
    fn test_first_value_sets_both_extrema() {
        let mut stat = FieldStat::new("Size");
        stat.record(-7.0);
        assert_eq!(stat.minimum(), Some(-7.0));
        assert_eq!(stat.maximum(), Some(-7.0));
        assert_eq!(stat.average(), Some(-7.0));
    }

    #[test]
    fn test_running_values() {
        let mut stat = FieldStat::new("Size");
        for v in [10.0, 30.0, 5.0, 15.0] {
            stat.record(v);
        }
        assert_eq!(stat.count_evaluated(), 4);
        assert_eq!(stat.sum(), 60.0);
        assert_eq!(stat.average(), Some(15.0));
        assert_eq!(stat.minimum(), Some(5.0));
        assert_eq!(stat.maximum(), Some(30.0));
    }

    #[test]
    fn test_skip_leaves_values_untouched() {
        let mut stat = FieldStat::new("Size");
        stat.record(3.0);
        stat.skip();
        stat.skip();
        assert_eq!(stat.count_skipped(), 2);
        assert_eq!(stat.count_evaluated(), 1);
        assert_eq!(stat.sum(), 3.0);
        assert_eq!(stat.average(), Some(3.0));
    }
}
