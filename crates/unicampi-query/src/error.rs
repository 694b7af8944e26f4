//! Error types for unicampi-query operations.

use std::io;
use thiserror::Error;

use crate::query::Operator;

/// The error type for unicampi-query operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading a snapshot.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid JSONL format.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),

    /// A query key named an operator outside the supported set.
    #[error("unknown operator {{{0}}}")]
    UnknownOperator(String),

    /// A membership test was attempted against a value that is not a
    /// string, array or object, or a non-string was looked up in a string.
    #[error("field '{field}' cannot be tested with '{operator}': membership is undefined for these values")]
    NotAContainer {
        /// Field the predicate targets.
        field: String,
        /// Operator that required a container.
        operator: Operator,
    },

    /// No segment contains the locate pattern.
    #[error("pattern not found: {0:?}")]
    PatternNotFound(String),

    /// No segment at or after the anchor contains the end pattern.
    #[error("end pattern not found: {0:?}")]
    EndPatternNotFound(String),

    /// The requested segment index lies past the end of the segment list.
    #[error("segment {index} out of range (only {len} segments)")]
    SegmentOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of segments available.
        len: usize,
    },
}

/// A specialized Result type for unicampi-query operations.
pub type Result<T> = std::result::Result<T, Error>;
