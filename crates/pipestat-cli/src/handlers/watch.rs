//! Watch command handler

use super::input::{InputRecord, InputSource, RecordReader};
use crate::cli::WatchArgs;
use crate::config::{Config, WatchConfig};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use indicatif::ProgressBar;
use pipestat_core::{
    drive, AggregationSession, CancelToken, EmitMode, SessionConfig, Sink, Snapshot,
};
use tracing::{debug, info, instrument, warn};

/// Watch settings after merging flags over the configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSettings {
    pub fields: Vec<String>,
    pub emit_mode: EmitMode,
    pub bytes: bool,
    pub progress: bool,
    pub skip_invalid: bool,
}

impl WatchSettings {
    pub fn resolve(args: &WatchArgs, config: &WatchConfig) -> Self {
        let given = if args.fields.is_empty() {
            &config.fields
        } else {
            &args.fields
        };
        // `-f Length,` splits into a trailing empty name
        let fields = given
            .iter()
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .collect();

        Self {
            fields,
            emit_mode: if args.stats {
                EmitMode::StatsOnly
            } else {
                EmitMode::Passthrough
            },
            bytes: args.bytes || config.bytes,
            progress: !args.no_progress && config.progress,
            skip_invalid: args.skip_invalid || config.skip_invalid,
        }
    }

    fn session_config(&self, live_snapshots: bool) -> SessionConfig {
        SessionConfig::new(self.fields.iter().cloned())
            .emit_mode(self.emit_mode)
            .byte_format(self.bytes)
            .live_snapshots(live_snapshots)
    }
}

/// Sink that writes forwarded records to the output and snapshots to a spinner.
///
/// A failed write flips the cancel token, so a closed downstream ends the
/// input the same way an interrupt does.
struct OutputSink<'a> {
    output: &'a mut OutputWriter,
    spinner: Option<ProgressBar>,
    cancel: CancelToken,
    error: Option<Error>,
}

impl<'a> OutputSink<'a> {
    fn new(output: &'a mut OutputWriter, spinner: Option<ProgressBar>, cancel: CancelToken) -> Self {
        Self {
            output,
            spinner,
            cancel,
            error: None,
        }
    }

    /// Leave the last snapshot on screen and return any write failure
    fn finish(self) -> Option<Error> {
        if let Some(spinner) = self.spinner {
            spinner.finish();
        }
        self.error
    }
}

impl Sink<InputRecord> for OutputSink<'_> {
    fn forward(&mut self, record: InputRecord) {
        if self.error.is_some() {
            return;
        }

        let output = &mut *self.output;
        let written = match &self.spinner {
            Some(spinner) => spinner.suspend(|| output.record(&record.raw)),
            None => output.record(&record.raw),
        };

        if let Err(e) = written {
            debug!(error = %e, "Downstream write failed, stopping input");
            self.error = Some(e);
            self.cancel.cancel();
        }
    }

    fn progress(&mut self, snapshot: &Snapshot) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(snapshot.to_string());
        }
    }
}

/// Shown when the user interrupts; a read in progress has to return first
const INTERRUPT_NOTICE: &str =
    "Interrupt received, stopping after the current record (idle input stops at the next line or end of input)";

/// Flip `cancel` when the user interrupts the process
async fn cancel_on_interrupt(cancel: CancelToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("{}", INTERRUPT_NOTICE);
        cancel.cancel();
    }
}

/// Handle the watch command
#[instrument(skip_all, fields(inputs = args.inputs.len(), stats = args.stats))]
pub async fn handle_watch(args: WatchArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("watch_command");
    let settings = WatchSettings::resolve(&args, &config.watch);
    debug!(?settings, "Resolved watch settings");

    let spinner = if settings.progress {
        output.progress_spinner("Waiting for records...")
    } else {
        None
    };
    let session = AggregationSession::start(settings.session_config(spinner.is_some()))?;

    let cancel = CancelToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let mut reader = RecordReader::new(
        InputSource::from_args(&args.inputs),
        args.input_format,
        settings.skip_invalid,
    );
    let mut sink = OutputSink::new(output, spinner, cancel.clone());
    let completion = drive(session, &mut reader, &cancel, &mut sink);
    let write_error = sink.finish();
    interrupt.abort();

    if let Some(error) = write_error {
        if error.is_broken_pipe() {
            debug!(records = completion.record_count, "Downstream closed the pipe");
            return Ok(());
        }
        return Err(error);
    }
    if let Some(error) = reader.take_error() {
        return Err(error);
    }

    if reader.dropped() > 0 {
        output.warning(&format!("Dropped {} malformed input lines", reader.dropped()))?;
    }
    if completion.cancelled {
        output.warning(&format!(
            "Interrupted after {} records; statistics are partial",
            completion.record_count
        ))?;
    }

    output.final_result(&completion.result)?;
    output.flush()?;

    info!(
        records = completion.record_count,
        cancelled = completion.cancelled,
        elapsed_ms = completion.elapsed().num_milliseconds(),
        "Watch finished"
    );
    if settings.emit_mode == EmitMode::StatsOnly && completion.result.fields().is_none() {
        warn!("No tracked field held a numeric value; reported the record count instead");
    }

    Ok(())
}
