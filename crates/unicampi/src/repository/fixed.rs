//! In-memory crawler repository over a fixed list of records.
//!
//! Useful in tests of code that depends on [`CrawlerRepository`], and for
//! callers that already hold scraped records and only need querying.

use async_trait::async_trait;
use unicampi_query::{Query, Record};

use super::{CrawlerRepository, find_by_id};
use crate::domain::EntryId;
use crate::error::Result;

/// Crawler repository whose source is a list held in memory.
#[derive(Debug, Clone)]
pub struct StaticCrawler {
    records: Vec<Record>,
    id_field: String,
    query: Query,
    required_fields: Vec<String>,
}

impl StaticCrawler {
    /// Creates a repository over `records`, identified by `id_field`.
    pub fn new(records: Vec<Record>, id_field: impl Into<String>) -> Self {
        Self {
            records,
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
}

#[async_trait]
impl CrawlerRepository for StaticCrawler {
    fn query(&self) -> &Query {
        &self.query
    }

    fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    async fn fetch_one(&self, id: &EntryId) -> Result<Record> {
        find_by_id(&self.records, &self.id_field, id)
    }
}
