//! JSONL reading operations.
//!
//! Crawled records are stored as JSON Lines snapshots, one record per line.
//! [`JsonlReader`] reads such data line by line with 1-based line tracking,
//! and [`read_records_resilient`] loads a whole snapshot while skipping the
//! lines that cannot be used.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::warning::Warning;

/// Async reader for JSONL (JSON Lines) data.
///
/// # Examples
///
/// ```no_run
/// use unicampi_query::{JsonlReader, Record};
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("snapshot.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(record) = reader.read_line::<Record>().await? {
///     println!("{record:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last line read, 0 before any read.
    line_number: usize,
    buffer: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the number of the last line read.
    ///
    /// Returns 0 before any lines have been read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line, returning it with its line number.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the underlying reader fails or the data is not
    /// valid UTF-8.
    pub async fn read_raw_line(&mut self) -> Result<Option<(usize, &str)>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer).await? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if !self.buffer.trim().is_empty() {
                return Ok(Some((self.line_number, self.buffer.trim())));
            }
        }
    }

    /// Reads and deserializes the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFormat` naming the line number if the line
    /// does not deserialize into `T`.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some((line_number, line)) = self.read_raw_line().await? else {
            return Ok(None);
        };

        serde_json::from_str(line)
            .map(Some)
            .map_err(|e| Error::InvalidFormat(format!("line {line_number}: {e}")))
    }
}

/// Loads every usable record from a JSONL snapshot.
///
/// Lines that are not valid JSON, and lines holding JSON that is not an
/// object, are skipped and reported as warnings. Blank lines are ignored
/// silently.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn read_records_resilient(
    path: impl AsRef<Path>,
) -> Result<(Vec<Record>, Vec<Warning>)> {
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut reader = JsonlReader::new(file);
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    while let Some((line_number, line)) = reader.read_raw_line().await? {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(other) => warnings.push(Warning::SkippedLine {
                line_number,
                reason: format!("expected a JSON object, found {}", kind_of(&other)),
            }),
            Err(e) => warnings.push(Warning::MalformedJson {
                line_number,
                error: e.to_string(),
            }),
        }
    }

    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        warnings = warnings.len(),
        "loaded snapshot"
    );
    Ok((records, warnings))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b""));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn reads_records_and_tracks_lines() {
        let data = "{\"id\": 1}\n\n{\"id\": 2}\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes()));

        let first: Record = reader.read_line().await.unwrap().unwrap();
        assert_eq!(first["id"], 1);
        assert_eq!(reader.line_number(), 1);

        let second: Record = reader.read_line().await.unwrap().unwrap();
        assert_eq!(second["id"], 2);
        assert_eq!(reader.line_number(), 3);

        assert!(reader.read_line::<Record>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_line_names_line_number() {
        let data = "{\"id\": 1}\n{oops\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes()));

        reader.read_line::<Record>().await.unwrap();
        let err = reader.read_line::<Record>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.starts_with("line 2:")));
    }

    #[test]
    fn describes_value_kinds() {
        assert_eq!(kind_of(&serde_json::json!([1])), "an array");
        assert_eq!(kind_of(&Value::Null), "null");
    }
}
