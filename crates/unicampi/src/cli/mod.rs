//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `query`: List snapshot records matching field/operator conditions
//! - `find`: Show one snapshot record by id
//! - `locate`: Extract segments from a text file around a pattern
//!
//! # Example
//!
//! ```bash
//! unicampi query term=2016s1 'code__in=["MC102","MA111"]'
//! unicampi find MC102 --json
//! unicampi locate page.txt "Disciplinas" --offset 1 --until "Fim"
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{FindArgs, LocateArgs, QueryArgs, SnapshotArgs};

use crate::config::UnicampiConfig;
use crate::output::OutputMode;

/// Unicampi - query scraped records
///
/// Filters crawled records with `field__operator=value` conditions and
/// extracts content from scraped text.
#[derive(Parser, Debug)]
#[command(name = "unicampi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./unicampi.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List records matching conditions
    ///
    /// Each condition is `field=value` or `field__operator=value`, with
    /// operators equals, not_equals, in, not_in, contains and not_contains.
    /// Values are read as JSON when they parse as JSON.
    Query(QueryArgs),

    /// Show one record by id
    Find(FindArgs),

    /// Extract segments of a text file around a pattern
    Locate(LocateArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => UnicampiConfig::load(path).await?,
            None => UnicampiConfig::discover(&std::env::current_dir()?).await?,
        };

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Commands::Query(args) => execute::execute_query(&config, args, output_mode).await,
            Commands::Find(args) => execute::execute_find(&config, args, output_mode).await,
            Commands::Locate(args) => execute::execute_locate(&config, args, output_mode).await,
        }
    }
}
