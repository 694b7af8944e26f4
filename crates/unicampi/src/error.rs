//! Error types for crawler repositories.

use std::io;
use thiserror::Error;

use crate::domain::EntryId;

/// The error type for unicampi operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Query, locate or snapshot error from unicampi-query.
    #[error(transparent)]
    Query(#[from] unicampi_query::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The query lacks fields the repository needs before it can fetch.
    #[error("Entries must be filtered by {}. Only then can they be fetched.", .missing.join(", "))]
    MissingRequiredFields {
        /// Required fields absent from the query, in declaration order.
        missing: Vec<String>,
    },

    /// A fetch hook found no entry for the id.
    #[error("no entry with id {0}")]
    MissingEntry(EntryId),

    /// A fetch hook found an entry without a field it needs.
    #[error("entry has no field '{0}'")]
    MissingField(String),

    /// The requested entry does not exist.
    #[error("unknown entry {0}")]
    NotFound(EntryId),
}

impl Error {
    /// Returns `true` for errors meaning a fetch hook could not find what
    /// it was looking up, as opposed to failing to fetch at all.
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        match self {
            Self::MissingEntry(_) | Self::MissingField(_) | Self::NotFound(_) => true,
            Self::Query(err) => matches!(
                err,
                unicampi_query::Error::PatternNotFound(_)
                    | unicampi_query::Error::EndPatternNotFound(_)
                    | unicampi_query::Error::SegmentOutOfRange { .. }
            ),
            Self::Io(_) | Self::Config(_) | Self::MissingRequiredFields { .. } => false,
        }
    }
}

/// A specialized Result type for unicampi operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::missing_entry(Error::MissingEntry(EntryId::new("7")), true)]
    #[case::missing_field(Error::MissingField("name".into()), true)]
    #[case::pattern(Error::Query(unicampi_query::Error::PatternNotFound("x".into())), true)]
    #[case::end_pattern(Error::Query(unicampi_query::Error::EndPatternNotFound("x".into())), true)]
    #[case::out_of_range(Error::Query(unicampi_query::Error::SegmentOutOfRange { index: 3, len: 1 }), true)]
    #[case::unknown_operator(Error::Query(unicampi_query::Error::UnknownOperator("x".into())), false)]
    #[case::io(Error::Io(io::Error::other("down")), false)]
    #[case::config(Error::Config("bad".into()), false)]
    fn classifies_lookup_errors(#[case] err: Error, #[case] expected: bool) {
        assert_eq!(err.is_lookup(), expected);
    }

    #[test]
    fn required_fields_message_lists_fields() {
        let err = Error::MissingRequiredFields {
            missing: vec!["term".into(), "level".into()],
        };
        assert_eq!(
            err.to_string(),
            "Entries must be filtered by term, level. Only then can they be fetched."
        );
    }
}
