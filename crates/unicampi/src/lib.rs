//! Unicampi - crawler repositories over scraped records.
//!
//! A crawler repository fetches records from some source (a scraped site, a
//! snapshot file, a fixed list) and filters them with the field/operator
//! query DSL from `unicampi-query`. This crate provides the repository
//! trait, two concrete repositories, configuration, and the CLI.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;

// Public CLI module (needed by binary)
pub mod cli;

pub(crate) mod output;

pub use unicampi_query::{ContentLocator, Query, QueryFilter, Record};
