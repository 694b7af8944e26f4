//! CLI argument structs for all commands.

use clap::{Args, Parser};
use std::path::PathBuf;

/// Snapshot selection shared by `query` and `find`
#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// JSONL snapshot to read (overrides `data-file`)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Record field holding the entry id (overrides `id-field`)
    #[arg(long)]
    pub id_field: Option<String>,
}

/// Arguments for the `query` command
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Query key that must be present (repeatable, overrides `required-fields`)
    #[arg(short, long)]
    pub require: Vec<String>,

    /// Conditions, e.g. `name=lucas` or `code__in=["MC102","MA111"]`
    pub conditions: Vec<String>,
}

/// Arguments for the `find` command
#[derive(Parser, Debug, Clone)]
pub struct FindArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Entry id to look up
    pub id: String,
}

/// Arguments for the `locate` command
#[derive(Parser, Debug, Clone)]
pub struct LocateArgs {
    /// Text file to search
    pub file: PathBuf,

    /// Text identifying the anchor segment
    pub pattern: String,

    /// Segments to skip after the anchor
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Stop this many segments after the anchor
    #[arg(short, long, conflicts_with = "until")]
    pub count: Option<usize>,

    /// Stop before the first segment containing this text
    #[arg(short, long)]
    pub until: Option<String>,

    /// Segment separator (overrides `separator`)
    #[arg(short, long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub separator: Option<String>,
}
