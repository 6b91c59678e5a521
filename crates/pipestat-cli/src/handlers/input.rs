//! Reading input records for the watch command
//!
//! Records come from files or stdin, framed either as JSON lines or as a
//! single JSON array. The reader is an iterator so it can be handed straight
//! to the aggregation driver; a failure ends the iteration and is kept for the
//! caller to collect with [`RecordReader::take_error`].

use crate::cli::InputFormat;
use crate::error::{Error, Result};
use pipestat_core::FieldSource;
use serde_json::Value;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One input record together with the text it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// Text forwarded downstream in passthrough mode
    pub raw: String,
    /// Parsed value the statistics are computed from
    pub value: Value,
}

impl FieldSource for InputRecord {
    fn field(&self, name: &str) -> Option<&Value> {
        self.value.field(name)
    }
}

/// Where records are read from
pub enum InputSource {
    Stdin,
    File(PathBuf),
    Reader {
        name: String,
        reader: Box<dyn BufRead>,
    },
}

impl InputSource {
    /// Map command-line inputs to sources; no inputs or `-` means stdin
    pub fn from_args(inputs: &[PathBuf]) -> Vec<InputSource> {
        if inputs.is_empty() {
            return vec![InputSource::Stdin];
        }

        inputs
            .iter()
            .map(|path| {
                if path == Path::new("-") {
                    InputSource::Stdin
                } else {
                    InputSource::File(path.clone())
                }
            })
            .collect()
    }

    /// Wrap an in-memory or otherwise prepared reader
    pub fn reader(name: impl Into<String>, reader: impl BufRead + 'static) -> Self {
        InputSource::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Name used in log lines and error messages
    pub fn name(&self) -> String {
        match self {
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.display().to_string(),
            InputSource::Reader { name, .. } => name.clone(),
        }
    }

    fn into_reader(self) -> Result<(String, Box<dyn BufRead>)> {
        let name = self.name();
        let reader: Box<dyn BufRead> = match self {
            InputSource::Stdin => Box::new(io::stdin().lock()),
            InputSource::File(path) => {
                let file = File::open(&path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => Error::FileNotFound { path: path.clone() },
                    _ => Error::Io(e),
                })?;
                Box::new(BufReader::new(file))
            }
            InputSource::Reader { reader, .. } => reader,
        };
        Ok((name, reader))
    }
}

/// A source currently being read
enum OpenSource {
    Lines {
        name: String,
        reader: Box<dyn BufRead>,
        buffer: Vec<u8>,
        line: u64,
    },
    Values {
        values: std::vec::IntoIter<Value>,
    },
}

impl OpenSource {
    fn open(source: InputSource, format: InputFormat) -> Result<Self> {
        let (name, reader) = source.into_reader()?;
        debug!(source = %name, ?format, "Opening input");

        match format {
            InputFormat::Jsonl => Ok(OpenSource::Lines {
                name,
                reader,
                buffer: Vec::new(),
                line: 0,
            }),
            InputFormat::Json => {
                let document: Value =
                    serde_json::from_reader(reader).map_err(|e| Error::InvalidInput {
                        source_name: name.clone(),
                        position: e.line() as u64,
                        message: e.to_string(),
                    })?;
                let values = match document {
                    Value::Array(items) => items,
                    single => vec![single],
                };
                Ok(OpenSource::Values {
                    values: values.into_iter(),
                })
            }
        }
    }

    fn next_record(&mut self) -> Option<Result<InputRecord>> {
        match self {
            OpenSource::Lines {
                name,
                reader,
                buffer,
                line,
            } => loop {
                buffer.clear();
                match reader.read_until(b'\n', buffer) {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(e) => return Some(Err(Error::Io(e))),
                }
                *line += 1;

                let invalid = |message: String| Error::InvalidInput {
                    source_name: name.clone(),
                    position: *line,
                    message,
                };
                let text = match std::str::from_utf8(trim_line_ending(buffer)) {
                    Ok(text) => text,
                    Err(e) => return Some(Err(invalid(e.to_string()))),
                };
                if text.trim().is_empty() {
                    continue;
                }

                let parsed =
                    serde_json::from_str::<Value>(text).map_err(|e| invalid(e.to_string()));
                return Some(parsed.map(|value| InputRecord {
                    raw: text.to_string(),
                    value,
                }));
            },
            OpenSource::Values { values } => {
                let value = values.next()?;
                Some(
                    serde_json::to_string(&value)
                        .map(|raw| InputRecord { raw, value })
                        .map_err(Error::from),
                )
            }
        }
    }
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Iterator over the records of every input, in order
pub struct RecordReader {
    pending: VecDeque<InputSource>,
    current: Option<OpenSource>,
    format: InputFormat,
    skip_invalid: bool,
    dropped: u64,
    error: Option<Error>,
}

impl RecordReader {
    pub fn new(sources: Vec<InputSource>, format: InputFormat, skip_invalid: bool) -> Self {
        Self {
            pending: sources.into(),
            current: None,
            format,
            skip_invalid,
            dropped: 0,
            error: None,
        }
    }

    /// Number of malformed lines dropped with `skip_invalid`
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// The error that ended iteration early, if any
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    fn fail(&mut self, error: Error) -> Option<InputRecord> {
        self.error = Some(error);
        self.current = None;
        self.pending.clear();
        None
    }
}

impl Iterator for RecordReader {
    type Item = InputRecord;

    fn next(&mut self) -> Option<InputRecord> {
        loop {
            if self.error.is_some() {
                return None;
            }

            if self.current.is_none() {
                let source = self.pending.pop_front()?;
                match OpenSource::open(source, self.format) {
                    Ok(open) => self.current = Some(open),
                    Err(e) => return self.fail(e),
                }
            }

            let Some(current) = self.current.as_mut() else {
                continue;
            };

            match current.next_record() {
                Some(Ok(record)) => return Some(record),
                Some(Err(e @ Error::InvalidInput { .. })) if self.skip_invalid => {
                    warn!("Dropping malformed input: {}", e);
                    self.dropped += 1;
                }
                Some(Err(e)) => return self.fail(e),
                None => self.current = None,
            }
        }
    }
}
