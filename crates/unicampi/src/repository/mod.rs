//! Crawler repository abstraction.
//!
//! A crawler repository knows how to fetch records from one source and
//! exposes them through two operations:
//!
//! - [`all`](CrawlerRepository::all): every record matching the repository's
//!   query
//! - [`find`](CrawlerRepository::find): one record by id
//!
//! Implementors supply the two fetch hooks, [`fetch_all`] and [`fetch_one`];
//! query validation, filtering and not-found handling are shared.
//!
//! # Required fields
//!
//! Some sources cannot be listed without narrowing them first (a course
//! catalogue has to be asked for one term at a time). Such a repository
//! declares [`required_fields`]; `all` refuses to run unless each of them is
//! a key of the query. Required fields are consumed by the fetch hook and
//! are not applied again as filters.
//!
//! # Example
//!
//! ```no_run
//! use unicampi::repository::{CrawlerRepository, StaticCrawler};
//! use unicampi::Query;
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let records = vec![
//!         json!({"id": "MC102", "credits": 6}).as_object().unwrap().clone(),
//!         json!({"id": "MA111", "credits": 6}).as_object().unwrap().clone(),
//!     ];
//!     let repo = StaticCrawler::new(records, "id")
//!         .with_query(Query::new().with("id__in", json!(["MC102"])));
//!
//!     let matched = repo.all().await?;
//!     assert_eq!(matched.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! [`fetch_all`]: CrawlerRepository::fetch_all
//! [`fetch_one`]: CrawlerRepository::fetch_one
//! [`required_fields`]: CrawlerRepository::required_fields

use async_trait::async_trait;
use serde_json::Value;
use unicampi_query::{Query, QueryFilter, Record};

use crate::domain::EntryId;
use crate::error::{Error, Result};

pub mod fixed;
pub mod jsonl;

pub use fixed::StaticCrawler;
pub use jsonl::JsonlCrawler;

/// Core trait for crawler repositories.
///
/// Implementations must be `Send + Sync` so repositories can be shared
/// across async tasks; all provided operations take `&self`.
#[async_trait]
pub trait CrawlerRepository: Send + Sync {
    /// The query this repository was built with.
    fn query(&self) -> &Query;

    /// Query keys that must be present before `all` can fetch.
    fn required_fields(&self) -> &[String] {
        &[]
    }

    /// Fetch and parse every entry from the source.
    async fn fetch_all(&self) -> Result<Vec<Record>>;

    /// Fetch and parse the entry with the given id.
    ///
    /// Implementations signal a missing entry with a lookup error such as
    /// `Error::MissingEntry`; see [`Error::is_lookup`].
    async fn fetch_one(&self, id: &EntryId) -> Result<Record>;

    /// Checks that every required field is a key of the query.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingRequiredFields` listing the absent fields.
    fn check_query(&self) -> Result<()> {
        let query = self.query();
        let missing: Vec<String> = self
            .required_fields()
            .iter()
            .filter(|field| !query.contains_key(field))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRequiredFields { missing })
        }
    }

    /// Returns every fetched record matching the non-required part of the
    /// query, in fetch order.
    ///
    /// Required fields are checked first, then the rest of the query is
    /// resolved into a [`QueryFilter`]. Both happen before `fetch_all` runs,
    /// so an invalid query never reaches the source.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use unicampi::error::Error;
    /// use unicampi::repository::{CrawlerRepository, StaticCrawler};
    /// use unicampi::Query;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let repo = StaticCrawler::new(Vec::new(), "code").with_required_fields(["term"]);
    /// assert!(matches!(
    ///     repo.all().await,
    ///     Err(Error::MissingRequiredFields { .. })
    /// ));
    ///
    /// let repo = repo.with_query(Query::new().with("term", "2016s1"));
    /// assert!(repo.all().await?.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - `Error::MissingRequiredFields` if the query lacks a required field
    /// - `Error::Query` if the query names an unknown operator or a
    ///   membership test meets a non-container
    /// - any error from `fetch_all`
    async fn all(&self) -> Result<Vec<Record>> {
        self.check_query()?;
        let filter = QueryFilter::new(&self.query().without(self.required_fields()))?;

        let records = self.fetch_all().await?;
        let fetched = records.len();
        let matched = filter.apply(records)?;

        tracing::debug!(fetched, matched = matched.len(), "filtered crawled entries");
        Ok(matched)
    }

    /// Returns the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when `fetch_one` fails with a lookup
    /// error. Other errors are returned unchanged.
    async fn find(&self, id: &EntryId) -> Result<Record> {
        match self.fetch_one(id).await {
            Err(err) if err.is_lookup() => {
                tracing::debug!(%id, error = %err, "entry lookup failed");
                Err(Error::NotFound(id.clone()))
            }
            other => other,
        }
    }
}

/// Returns the id of a record as text, if its id field is a string or a
/// number.
#[must_use]
pub fn record_id(record: &Record, id_field: &str) -> Option<String> {
    match record.get(id_field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the first record whose id field matches `id`.
///
/// # Errors
///
/// Returns `Error::MissingEntry` if no record matches.
pub fn find_by_id<'a, I>(records: I, id_field: &str, id: &EntryId) -> Result<Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .find(|record| record_id(record, id_field).as_deref() == Some(id.as_str()))
        .cloned()
        .ok_or_else(|| Error::MissingEntry(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unicampi_query::ContentLocator;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    /// Parses a plain-text listing the way a site crawler would, so fetch
    /// errors come from the locator rather than being constructed by hand.
    struct ListingCrawler {
        page: String,
        query: Query,
        required: Vec<String>,
    }

    #[async_trait]
    impl CrawlerRepository for ListingCrawler {
        fn query(&self) -> &Query {
            &self.query
        }

        fn required_fields(&self) -> &[String] {
            &self.required
        }

        async fn fetch_all(&self) -> Result<Vec<Record>> {
            let locator = ContentLocator::new(&self.page);
            let codes = locator.find_until("Disciplinas", 1, "Fim")?;
            Ok(codes
                .into_iter()
                .map(|code| record(json!({ "id": code, "term": "2016s1" })))
                .collect())
        }

        async fn fetch_one(&self, id: &EntryId) -> Result<Record> {
            let locator = ContentLocator::new(&self.page);
            let credits = locator.find_line(format!("{id}:"), 0)?;
            Ok(record(json!({ "id": id.as_str(), "credits": credits })))
        }
    }

    fn crawler(query: Query) -> ListingCrawler {
        ListingCrawler {
            page: "Disciplinas\nMC102\nMA111\nF128\nFim\nMC102: 6\n".to_string(),
            query,
            required: vec!["term".to_string()],
        }
    }

    #[tokio::test]
    async fn all_requires_declared_fields() {
        let err = crawler(Query::new()).all().await.unwrap_err();
        match err {
            Error::MissingRequiredFields { missing } => assert_eq!(missing, ["term"]),
            other => panic!("expected MissingRequiredFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_filters_on_remaining_fields() {
        let query = Query::new()
            .with("term", "2015s2")
            .with("id__in", json!(["MC102", "F128"]));
        let matched = crawler(query).all().await.unwrap();

        // `term` is consumed by the fetch, not applied as a filter: every
        // record says 2016s1 yet both ids come back.
        let ids: Vec<_> = matched.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, [json!("MC102"), json!("F128")]);
    }

    #[tokio::test]
    async fn all_rejects_unknown_operators() {
        let query = Query::new().with("term", "2016s1").with("id__like", "MC");
        let err = crawler(query).all().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Query(unicampi_query::Error::UnknownOperator(ref op)) if op == "like"
        ));
    }

    #[tokio::test]
    async fn all_propagates_fetch_errors() {
        let mut repo = crawler(Query::new().with("term", "2016s1"));
        repo.page = "nothing here".to_string();
        let err = repo.all().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Query(unicampi_query::Error::PatternNotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_returns_parsed_entry() {
        let found = crawler(Query::new())
            .find(&EntryId::new("MC102"))
            .await
            .unwrap();
        assert_eq!(found["credits"], "MC102: 6");
    }

    #[tokio::test]
    async fn find_maps_lookup_errors_to_not_found() {
        let err = crawler(Query::new())
            .find(&EntryId::new("XX999"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id.as_str() == "XX999"));
        assert_eq!(err.to_string(), "unknown entry XX999");
    }

    #[test]
    fn record_id_reads_strings_and_numbers() {
        assert_eq!(record_id(&record(json!({"id": "a"})), "id").as_deref(), Some("a"));
        assert_eq!(record_id(&record(json!({"id": 42})), "id").as_deref(), Some("42"));
        assert_eq!(record_id(&record(json!({"id": [1]})), "id"), None);
        assert_eq!(record_id(&record(json!({})), "id"), None);
    }

    #[test]
    fn find_by_id_reports_missing_entry() {
        let records = [record(json!({"id": 1})), record(json!({"id": 2}))];
        assert_eq!(
            find_by_id(&records, "id", &EntryId::new("2")).unwrap(),
            record(json!({"id": 2}))
        );
        assert!(matches!(
            find_by_id(&records, "id", &EntryId::new("3")),
            Err(Error::MissingEntry(_))
        ));
    }
}
