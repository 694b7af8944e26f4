//! Crawler repository over a JSONL snapshot.
//!
//! Crawls are often run once and stored, one scraped record per line, so
//! they can be queried later without hitting the site again. The snapshot
//! is re-read on every call; nothing is cached between calls.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use unicampi_query::{Query, Record, read_records_resilient};

use super::{CrawlerRepository, find_by_id};
use crate::domain::EntryId;
use crate::error::Result;

/// Crawler repository reading records from a JSONL file.
///
/// Lines that cannot be parsed as JSON objects are skipped and logged as
/// warnings.
#[derive(Debug, Clone)]
pub struct JsonlCrawler {
    path: PathBuf,
    id_field: String,
    query: Query,
    required_fields: Vec<String>,
}

impl JsonlCrawler {
    /// Creates a repository over the snapshot at `path`, identified by
    /// `id_field`.
    pub fn new(path: impl Into<PathBuf>, id_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id_field: id_field.into(),
            query: Query::new(),
            required_fields: Vec::new(),
        }
    }

    /// Sets the query applied by `all`.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets the query keys `all` insists on.
    #[must_use]
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Record>> {
        let (records, warnings) = read_records_resilient(&self.path).await?;
        for warning in &warnings {
            tracing::warn!(
                path = %self.path.display(),
                kind = warning.kind(),
                "{warning}"
            );
        }
        Ok(records)
    }
}

#[async_trait]
impl CrawlerRepository for JsonlCrawler {
    fn query(&self) -> &Query {
        &self.query
    }

    fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    async fn fetch_all(&self) -> Result<Vec<Record>> {
        self.load().await
    }

    async fn fetch_one(&self, id: &EntryId) -> Result<Record> {
        let records = self.load().await?;
        find_by_id(&records, &self.id_field, id)
    }
}
