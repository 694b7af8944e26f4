//! Output formatting for CLI commands.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use unicampi_query::Record;

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Print records, one JSON line each in JSON mode.
pub fn print_records(records: &[Record], id_field: &str, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Json => {
            for record in records {
                writeln!(handle, "{}", to_json(record)?)?;
            }
            Ok(())
        }
        OutputMode::Text => {
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    writeln!(handle)?;
                }
                write_record_text(&mut handle, record, id_field)?;
            }
            Ok(())
        }
    }
}

/// Print a list of text segments.
pub fn print_segments(segments: &[String], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Json => writeln!(handle, "{}", to_json(&segments)?),
        OutputMode::Text => {
            for segment in segments {
                writeln!(handle, "{segment}")?;
            }
            Ok(())
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> io::Result<String> {
    serde_json::to_string(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_record_text<W: Write>(w: &mut W, record: &Record, id_field: &str) -> io::Result<()> {
    if let Some(id) = record.get(id_field) {
        writeln!(w, "{}", display_value(id).bold().cyan())?;
    }
    for (key, value) in record {
        if key == id_field {
            continue;
        }
        writeln!(w, "  {}: {}", key.dimmed(), display_value(value))?;
    }
    Ok(())
}

// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
