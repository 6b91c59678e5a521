//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), including final
//! aggregation results and live progress display.
//!
//! Data (forwarded records and results) goes to the data writer, stdout by
//! default. Notices go to the message writer, stderr by default, so that a
//! passthrough stream stays machine-readable.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use is_terminal::IsTerminal;
use pipestat_core::{FieldSummary, FinalResult, Metric};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the final result of an aggregation session
    fn format_final_result(&self, result: &FinalResult) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_final_result(&self, result: &FinalResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_final_result_human(result)),
            _ => self.format(result),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    messages: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout/stderr
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
            messages: Box::new(io::stderr()),
        }
    }

    /// Create an output writer with custom writers
    pub fn with_writers(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        messages: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
            messages,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of data output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        Ok(())
    }

    /// Flush buffered data output
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Write a record forwarded in passthrough mode, exactly as received
    pub fn record(&mut self, raw: &str) -> Result<()> {
        self.writer.write_all(raw.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn message(&mut self, content: &str) -> Result<()> {
        writeln!(self.messages, "{}", content)?;
        self.messages.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        trace!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }

        if self.use_color {
            self.message(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.message(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_color {
            self.message(&message.green().to_string())
        } else {
            self.message(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.use_color {
            self.message(&message.yellow().to_string())
        } else {
            self.message(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write the final result of a session
    pub fn final_result(&mut self, result: &FinalResult) -> Result<()> {
        if let FinalResult::Forwarded { .. } = result {
            return Ok(());
        }
        let formatted = self.format.format_final_result(result)?;
        let formatted = formatted.trim_end();
        if self.use_color && self.format == OutputFormat::Human {
            let mut lines = formatted.lines();
            if let (Some(header), FinalResult::Fields(_)) = (lines.next(), result) {
                self.writeln(&header.bold().to_string())?;
                for line in lines {
                    self.writeln(line)?;
                }
                return Ok(());
            }
        }
        self.writeln(formatted)
    }

    /// Create a spinner for live snapshots, if progress display is possible
    pub fn progress_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn metric_cell(metric: &Option<Metric>) -> String {
    metric
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn summary_row(field: &FieldSummary) -> Vec<String> {
    vec![
        field.name.clone(),
        field.count_evaluated.to_string(),
        field.count_skipped.to_string(),
        field.sum.to_string(),
        metric_cell(&field.average),
        metric_cell(&field.maximum),
        metric_cell(&field.minimum),
    ]
}

/// Format a final result for human reading
fn format_final_result_human(result: &FinalResult) -> String {
    match result {
        FinalResult::RecordCount(count) => count.to_string(),
        FinalResult::Fields(fields) => {
            let headers = [
                "Name", "Evaluated", "Skipped", "Sum", "Average", "Maximum", "Minimum",
            ];
            let rows = fields.iter().map(summary_row).collect::<Vec<_>>();
            render_table(&headers, &rows)
        }
        FinalResult::Forwarded { record_count } => {
            format!("{} records forwarded", record_count)
        }
    }
}

/// Render rows under headers with aligned columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    let header_row = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect::<Vec<_>>()
        .join(" │ ");
    output.push_str(header_row.trim_end());
    output.push('\n');

    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    output.push_str(&separator);
    output.push('\n');

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
