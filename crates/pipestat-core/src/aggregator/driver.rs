//! Cooperative pull loop over a record source
//!
//! [`drive`] pulls records one at a time, feeds them to a session and hands
//! forwarded records and snapshots to a [`Sink`]. Cancellation is checked
//! before every pull; a cancelled run is finalized with whatever state has
//! accumulated, through the same path as a completed one.
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use super::session::AggregationSession;
use super::snapshot::Snapshot;
use super::summary::FinalResult;
use crate::record::FieldSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag an upstream caller flips to stop the input early
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Downstream receiver for a driven session
pub trait Sink<R> {
    /// Receive a record forwarded in passthrough mode
    fn forward(&mut self, record: R);

    /// Receive a live snapshot. Ignored by default.
    fn progress(&mut self, _snapshot: &Snapshot) {}
}

/// Collects forwarded records
impl<R> Sink<R> for Vec<R> {
    fn forward(&mut self, record: R) {
        self.push(record);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<R> Sink<R> for NullSink {
    fn forward(&mut self, _record: R) {}
}

/// Outcome of a driven session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub result: FinalResult,
    pub cancelled: bool,
    pub record_count: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Completion {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Run `session` over `records` until the input ends or `cancel` is set
pub fn drive<I, R, S>(
    mut session: AggregationSession,
    records: I,
    cancel: &CancelToken,
    sink: &mut S,
) -> Completion
where
    I: IntoIterator<Item = R>,
    R: FieldSource,
    S: Sink<R> + ?Sized,
{
    let started_at = Utc::now();
    let mut records = records.into_iter();
    let mut cancelled = false;

    loop {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        let Some(record) = records.next() else {
            break;
        };

        let observation = session.observe(record);
        if let Some(snapshot) = &observation.snapshot {
            sink.progress(snapshot);
        }
        if let Some(record) = observation.forwarded {
            sink.forward(record);
        }
    }

    let record_count = session.record_count();
    let result = if cancelled {
        session.cancel()
    } else {
        session.finish()
    };

    Completion {
        result,
        cancelled,
        record_count,
        started_at,
        finished_at: Utc::now(),
    }
}
