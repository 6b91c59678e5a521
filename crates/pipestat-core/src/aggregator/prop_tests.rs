//! Property-based tests for the running statistics
//!
//! Each property compares the streaming session against a direct
//! computation over the same values.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::proptest_strategies::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn stats_only(fields: &[&str]) -> AggregationSession {
        AggregationSession::start(
            SessionConfig::new(fields.iter().copied()).emit_mode(EmitMode::StatsOnly),
        )
        .unwrap()
    }

    /// Cancels the run once the snapshot reports `at` records
    struct CancelAt {
        at: u64,
        token: CancelToken,
    }

    impl Sink<Value> for CancelAt {
        fn forward(&mut self, _record: Value) {}

        fn progress(&mut self, snapshot: &Snapshot) {
            if snapshot.record_count >= self.at {
                self.token.cancel();
            }
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    proptest! {
        #[test]
        fn prop_mean_sum_and_extrema(values in proptest::collection::vec(finite_value_strategy(), 1..200)) {
            let mut session = stats_only(&["v"]);
            for v in &values {
                session.observe(json!({"v": v}));
            }

            let stat = session.stat("v").unwrap();
            let expected_sum: f64 = values.iter().sum();
            let expected_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let expected_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            prop_assert_eq!(stat.count_evaluated(), values.len() as u64);
            prop_assert!(close(stat.sum(), expected_sum));
            prop_assert!(close(stat.average().unwrap(), expected_sum / values.len() as f64));
            prop_assert_eq!(stat.minimum(), Some(expected_min));
            prop_assert_eq!(stat.maximum(), Some(expected_max));
        }

        #[test]
        fn prop_record_count_matches_observe_calls(records in record_stream_strategy(100)) {
            let mut session = stats_only(&["Size", "Count"]);
            for record in &records {
                session.observe(record);
            }

            prop_assert_eq!(session.record_count(), records.len() as u64);
            for stat in session.stats() {
                prop_assert_eq!(
                    stat.count_evaluated() + stat.count_skipped(),
                    records.len() as u64
                );
            }
        }

        #[test]
        fn prop_passthrough_is_transparent(records in record_stream_strategy(100)) {
            let session = AggregationSession::start(SessionConfig::new(["Size"])).unwrap();
            let mut forwarded: Vec<Value> = Vec::new();

            drive(session, records.clone(), &CancelToken::new(), &mut forwarded);
            prop_assert_eq!(forwarded, records);
        }

        #[test]
        fn prop_cancel_after_k_matches_finish_on_prefix(
            records in record_stream_strategy(60),
            cut in 0usize..60,
        ) {
            let k = cut.min(records.len());
            let token = CancelToken::new();
            if k == 0 {
                token.cancel();
            }

            let config = SessionConfig::new(["Size", "Count"])
                .emit_mode(EmitMode::StatsOnly)
                .live_snapshots(true);
            let session = AggregationSession::start(config).unwrap();
            let mut sink = CancelAt { at: k as u64, token: token.clone() };
            let completion = drive(session, records.clone(), &token, &mut sink);

            let mut completed = stats_only(&["Size", "Count"]);
            for record in &records[..k] {
                completed.observe(record);
            }

            prop_assert_eq!(completion.record_count, k as u64);
            prop_assert_eq!(completion.result, completed.finish());
        }
    }
}
