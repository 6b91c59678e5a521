//! Format-bytes command handler

use crate::cli::{FormatBytesArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use pipestat_core::format_bytes;
use serde::Serialize;

/// One formatted value, as emitted in structured output formats
#[derive(Debug, Serialize)]
struct FormattedValue {
    value: f64,
    formatted: String,
}

/// Handle the format-bytes command
pub fn handle_format_bytes(args: FormatBytesArgs, output: &mut OutputWriter) -> Result<()> {
    if let Some(bad) = args.values.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid_args(format!("{} is not a finite number", bad)));
    }

    let formatted = args
        .values
        .iter()
        .map(|&value| FormattedValue {
            value,
            formatted: format_bytes(value),
        })
        .collect::<Vec<_>>();

    match output.format() {
        OutputFormat::Human => {
            for item in &formatted {
                output.writeln(&item.formatted)?;
            }
        }
        _ => output.data(&formatted)?,
    }

    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(format: OutputFormat, values: Vec<f64>) -> String {
        let buffer = SharedBuffer::default();
        let mut output = OutputWriter::with_writers(
            format,
            false,
            false,
            Box::new(buffer.clone()),
            Box::new(io::sink()),
        );
        handle_format_bytes(FormatBytesArgs { values }, &mut output).unwrap();
        let bytes = buffer.0.borrow().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_human_prints_one_per_line() {
        assert_eq!(
            run(OutputFormat::Human, vec![0.0, 1536.0, -2048.0]),
            "0B\n1.5 KB\n-2 KB\n"
        );
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut output = OutputWriter::with_writers(
            OutputFormat::Human,
            false,
            false,
            Box::new(io::sink()),
            Box::new(io::sink()),
        );
        let args = FormatBytesArgs {
            values: vec![1.0, f64::NAN],
        };
        let err = handle_format_bytes(args, &mut output).unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_json_pairs_values_with_text() {
        let text = run(OutputFormat::Json, vec![1024.0]);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{"value": 1024.0, "formatted": "1 KB"}])
        );
    }
}
