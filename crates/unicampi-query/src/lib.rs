//! In-memory querying of scraped records.
//!
//! This library provides the field/operator query DSL used to filter
//! crawled records, a line-oriented content locator for picking values out
//! of scraped text, and resilient loading of JSONL record snapshots.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod locator;
pub mod query;
pub mod reader;
pub mod record;
pub mod warning;

pub use error::{Error, Result};
pub use locator::{ContentLocator, Located, LocateOptions};
pub use query::{Operator, Predicate, Query, QueryFilter};
pub use reader::{JsonlReader, read_records_resilient};
pub use record::Record;
pub use warning::Warning;
