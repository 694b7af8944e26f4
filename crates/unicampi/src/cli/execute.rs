//! Command execution logic.

use anyhow::{Context, Result};
use unicampi_query::{ContentLocator, LocateOptions, Query};

use super::args::{FindArgs, LocateArgs, QueryArgs, SnapshotArgs};
use crate::config::UnicampiConfig;
use crate::domain::EntryId;
use crate::output::{self, OutputMode};
use crate::repository::{CrawlerRepository, JsonlCrawler};

fn open_snapshot(config: &UnicampiConfig, args: &SnapshotArgs) -> (JsonlCrawler, String) {
    let path = args.data.clone().unwrap_or_else(|| config.data_file.clone());
    let id_field = args
        .id_field
        .clone()
        .unwrap_or_else(|| config.id_field.clone());
    (JsonlCrawler::new(path, id_field.clone()), id_field)
}

/// Execute the query command
pub async fn execute_query(
    config: &UnicampiConfig,
    args: &QueryArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut query = Query::new();
    for condition in &args.conditions {
        query.insert_condition(condition)?;
    }

    let required = if args.require.is_empty() {
        config.required_fields.clone()
    } else {
        args.require.clone()
    };

    let (repo, id_field) = open_snapshot(config, &args.snapshot);
    let repo = repo.with_query(query).with_required_fields(required);

    let records = repo
        .all()
        .await
        .with_context(|| format!("Failed to query {}", repo.path().display()))?;
    tracing::info!(matched = records.len(), "query complete");

    output::print_records(&records, &id_field, output_mode)?;
    Ok(())
}

/// Execute the find command
pub async fn execute_find(
    config: &UnicampiConfig,
    args: &FindArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let (repo, id_field) = open_snapshot(config, &args.snapshot);
    let record = repo.find(&EntryId::new(args.id.as_str())).await?;

    output::print_records(std::slice::from_ref(&record), &id_field, output_mode)?;
    Ok(())
}

/// Execute the locate command
pub async fn execute_locate(
    config: &UnicampiConfig,
    args: &LocateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let separator = args.separator.as_deref().unwrap_or(&config.separator);
    let locator = ContentLocator::with_separator(&text, separator);

    let mut options = LocateOptions::new().offset(args.offset);
    if let Some(count) = args.count {
        options = options.count(count);
    }
    if let Some(until) = &args.until {
        options = options.until(until);
    }

    let located = locator.locate(&args.pattern, options)?;
    output::print_segments(&located.to_vec(), output_mode)?;
    Ok(())
}
