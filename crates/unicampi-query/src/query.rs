//! Query and filter operations over records.
//!
//! A [`Query`] is an ordered list of compound keys and target values. Each
//! key is either a bare field name, which tests equality, or
//! `field__operator`:
//!
//! ```
//! use serde_json::json;
//! use unicampi_query::{Query, QueryFilter, Record};
//!
//! let users: Vec<Record> = ["lucas", "kelly", "adam", "jessica"]
//!     .iter()
//!     .map(|n| json!({ "name": n }).as_object().unwrap().clone())
//!     .collect();
//!
//! let query = Query::new().with("name__in", json!(["lucas", "jessica"]));
//! let matched = QueryFilter::new(&query).unwrap().apply(users).unwrap();
//!
//! assert_eq!(matched.len(), 2);
//! assert_eq!(matched[0]["name"], "lucas");
//! assert_eq!(matched[1]["name"], "jessica");
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::{self, Record};

/// Delimiter between a field name and its operator in a query key.
pub const OPERATOR_DELIMITER: &str = "__";

/// Comparison or membership test applied between a field and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Field value equals the target.
    Equals,

    /// Field value differs from the target.
    NotEquals,

    /// Field value is a member of the target.
    In,

    /// Field value is not a member of the target.
    NotIn,

    /// Target is a member of the field value.
    Contains,

    /// Evaluates exactly like [`Operator::Contains`].
    ///
    /// Scrapers written against this operator rely on the inclusive
    /// behavior, so it is kept rather than negated.
    NotContains,
}

impl Operator {
    /// Every supported operator, keyed by the name used in query keys.
    pub const ALL: [(&'static str, Operator); 6] = [
        ("equals", Operator::Equals),
        ("not_equals", Operator::NotEquals),
        ("in", Operator::In),
        ("not_in", Operator::NotIn),
        ("contains", Operator::Contains),
        ("not_contains", Operator::NotContains),
    ];

    /// Returns the name used for this operator in query keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, op)| *op)
            .ok_or_else(|| Error::UnknownOperator(s.to_string()))
    }
}

/// Ordered mapping from compound keys to target values.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Iteration follows insertion order, which is also evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    entries: Vec<(String, Value)>,
}

impl Query {
    /// Creates an empty query, which matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition and returns the query, for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a condition, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Parses a `key=value` condition and adds it.
    ///
    /// The value is read as JSON when it parses as JSON, and as a plain
    /// string otherwise, so `year=2016` targets a number while
    /// `name=lucas` targets the string `"lucas"`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFormat` if the condition has no `=` or an
    /// empty key.
    pub fn insert_condition(&mut self, condition: &str) -> Result<()> {
        let (key, raw) = condition.split_once('=').ok_or_else(|| {
            Error::InvalidFormat(format!("condition '{condition}' must be key=value"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "condition '{condition}' has an empty key"
            )));
        }
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.insert(key, value);
        Ok(())
    }

    /// Returns the target value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the query has a condition under exactly `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the compound keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of this query without the given keys.
    #[must_use]
    pub fn without<S: AsRef<str>>(&self, keys: &[S]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !keys.iter().any(|excluded| excluded.as_ref() == k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Returns the number of conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the query has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

/// A resolved `(field, operator, value)` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Record field the condition reads.
    pub field: String,
    /// Test applied to the field.
    pub operator: Operator,
    /// Target value.
    pub value: Value,
}

impl Predicate {
    /// Resolves a compound key into a predicate.
    ///
    /// The key is split on its last `__`: `name__in` is field `name` with
    /// operator `in`, and `course__code__in` is field `course__code` with
    /// operator `in`. A key without `__` tests equality.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownOperator` if the trailing segment is not a
    /// supported operator name.
    pub fn parse(key: &str, value: Value) -> Result<Self> {
        let (field, operator) = match key.rsplit_once(OPERATOR_DELIMITER) {
            Some((field, name)) => (field, name.parse()?),
            None => (key, Operator::Equals),
        };

        Ok(Self {
            field: field.to_string(),
            operator,
            value,
        })
    }

    /// Evaluates the predicate against one record.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotAContainer` when a membership operator meets a
    /// value that cannot contain anything, or looks up a non-string in a
    /// string.
    pub fn evaluate(&self, record: &Record) -> Result<bool> {
        let actual = record::field(record, &self.field);

        match self.operator {
            Operator::Equals => Ok(record::values_equal(actual, &self.value)),
            Operator::NotEquals => Ok(!record::values_equal(actual, &self.value)),
            Operator::In => self.member(actual, &self.value),
            Operator::NotIn => self.member(actual, &self.value).map(|hit| !hit),
            Operator::Contains | Operator::NotContains => self.member(&self.value, actual),
        }
    }

    fn member(&self, needle: &Value, haystack: &Value) -> Result<bool> {
        record::is_member(needle, haystack).ok_or_else(|| Error::NotAContainer {
            field: self.field.clone(),
            operator: self.operator,
        })
    }
}

/// Filters records against every predicate of a query.
///
/// A record matches when all predicates hold. Evaluation stops at the first
/// predicate that fails, so later predicates never see that record.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    predicates: Vec<Predicate>,
}

impl QueryFilter {
    /// Resolves all keys of `query` into predicates.
    ///
    /// Every key is resolved up front, so a bad operator is reported even
    /// when there are no records to filter.
    ///
    /// # Arguments
    ///
    /// * `query` - The conditions to resolve, in evaluation order.
    ///
    /// # Examples
    ///
    /// ```
    /// use unicampi_query::{Error, Operator, Query, QueryFilter};
    ///
    /// let query = Query::new().with("code__in", vec!["MC102"]).with("credits", 6);
    /// let filter = QueryFilter::new(&query).unwrap();
    /// assert_eq!(filter.predicates()[0].operator, Operator::In);
    ///
    /// let bad = Query::new().with("code__bogus", 1);
    /// assert!(matches!(QueryFilter::new(&bad), Err(Error::UnknownOperator(_))));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownOperator` for the first key whose operator is
    /// not supported.
    pub fn new(query: &Query) -> Result<Self> {
        let predicates = query
            .iter()
            .map(|(key, value)| Predicate::parse(key, value.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { predicates })
    }

    /// Returns the resolved predicates in evaluation order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns `true` if `record` satisfies every predicate.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate evaluation error.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        for predicate in &self.predicates {
            if !predicate.evaluate(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keeps the records that match, preserving their order.
    ///
    /// # Errors
    ///
    /// Fails on the first evaluation error; no partial result is returned.
    pub fn apply<I>(&self, records: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut matched = Vec::new();
        let mut seen = 0usize;

        for record in records {
            seen += 1;
            if self.matches(&record)? {
                matched.push(record);
            }
        }

        tracing::debug!(
            predicates = self.predicates.len(),
            seen,
            matched = matched.len(),
            "applied query filter"
        );
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    fn users() -> Vec<Record> {
        ["lucas", "kelly", "adam", "jessica"]
            .iter()
            .map(|n| record(json!({ "name": n })))
            .collect()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r["name"].as_str().unwrap()).collect()
    }

    #[rstest]
    #[case::bare("name", "name", Operator::Equals)]
    #[case::explicit_equals("name__equals", "name", Operator::Equals)]
    #[case::not_equals("name__not_equals", "name", Operator::NotEquals)]
    #[case::in_op("name__in", "name", Operator::In)]
    #[case::not_in("name__not_in", "name", Operator::NotIn)]
    #[case::contains("tags__contains", "tags", Operator::Contains)]
    #[case::not_contains("tags__not_contains", "tags", Operator::NotContains)]
    #[case::nested_field("course__code__in", "course__code", Operator::In)]
    #[case::empty_field("__in", "", Operator::In)]
    fn parses_compound_keys(#[case] key: &str, #[case] field: &str, #[case] operator: Operator) {
        let predicate = Predicate::parse(key, json!(null)).unwrap();
        assert_eq!(predicate.field, field);
        assert_eq!(predicate.operator, operator);
    }

    #[rstest]
    #[case::bogus("field__bogus", "bogus")]
    #[case::trailing_delimiter("field__", "")]
    #[case::field_with_delimiter("course__code", "code")]
    fn rejects_unknown_operators(#[case] key: &str, #[case] operator: &str) {
        let err = Predicate::parse(key, json!(1)).unwrap_err();
        match err {
            Error::UnknownOperator(name) => assert_eq!(name, operator),
            other => panic!("expected UnknownOperator, got {other:?}"),
        }
    }

    #[test]
    fn unknown_operator_message_names_operator() {
        let query = Query::new().with("field__bogus", 1);
        let err = QueryFilter::new(&query).unwrap_err();
        assert_eq!(err.to_string(), "unknown operator {bogus}");
    }

    #[test]
    fn operator_names_round_trip() {
        for (name, op) in Operator::ALL {
            assert_eq!(op.as_str(), name);
            assert_eq!(name.parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn empty_query_is_identity() {
        let filter = QueryFilter::new(&Query::new()).unwrap();
        assert_eq!(filter.apply(users()).unwrap(), users());
    }

    #[test]
    fn in_preserves_input_order() {
        let query = Query::new().with("name__in", json!(["jessica", "lucas"]));
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert_eq!(names(&matched), ["lucas", "jessica"]);
    }

    #[test]
    fn not_in_excludes_members() {
        let query = Query::new().with("name__not_in", json!(["lucas", "jessica"]));
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert_eq!(names(&matched), ["kelly", "adam"]);
    }

    #[test]
    fn bare_key_tests_equality() {
        let query = Query::new().with("name", "adam");
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert_eq!(names(&matched), ["adam"]);
    }

    #[test]
    fn not_equals_excludes_value() {
        let query = Query::new().with("name__not_equals", "adam");
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert_eq!(names(&matched), ["lucas", "kelly", "jessica"]);
    }

    #[test]
    fn contains_tests_field_membership() {
        let records = vec![
            record(json!({"code": "MC102", "days": ["mon", "wed"]})),
            record(json!({"code": "MA111", "days": ["tue"]})),
        ];
        let query = Query::new().with("days__contains", "wed");
        let matched = QueryFilter::new(&query).unwrap().apply(records).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["code"], "MC102");
    }

    #[test]
    fn contains_matches_substrings() {
        let records = vec![
            record(json!({"title": "Algoritmos e Programacao"})),
            record(json!({"title": "Calculo I"})),
        ];
        let query = Query::new().with("title__contains", "Calc");
        let matched = QueryFilter::new(&query).unwrap().apply(records).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["title"], "Calculo I");
    }

    #[test]
    fn not_contains_behaves_like_contains() {
        let records = vec![
            record(json!({"days": ["mon", "wed"]})),
            record(json!({"days": ["tue"]})),
        ];
        let contains = QueryFilter::new(&Query::new().with("days__contains", "wed"))
            .unwrap()
            .apply(records.clone())
            .unwrap();
        let not_contains = QueryFilter::new(&Query::new().with("days__not_contains", "wed"))
            .unwrap()
            .apply(records)
            .unwrap();
        assert_eq!(contains, not_contains);
    }

    #[test]
    fn missing_field_compares_as_null() {
        let records = vec![record(json!({"name": "lucas"})), record(json!({}))];
        let query = Query::new().with("name", Value::Null);
        let matched = QueryFilter::new(&query).unwrap().apply(records).unwrap();
        assert_eq!(matched, vec![record(json!({}))]);
    }

    #[test]
    fn missing_field_is_not_in_target() {
        let query = Query::new().with("age__in", json!([1, 2]));
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn contains_on_missing_field_is_an_error() {
        let query = Query::new().with("tags__contains", "x");
        let err = QueryFilter::new(&query).unwrap().apply(users()).unwrap_err();
        assert!(matches!(
            err,
            Error::NotAContainer { ref field, operator: Operator::Contains } if field == "tags"
        ));
    }

    #[test]
    fn missing_field_in_string_is_an_error() {
        let query = Query::new().with("nickname__in", "lucas kelly");
        let err = QueryFilter::new(&query).unwrap().apply(users()).unwrap_err();
        assert!(matches!(
            err,
            Error::NotAContainer { ref field, operator: Operator::In } if field == "nickname"
        ));
    }

    #[test]
    fn predicates_short_circuit() {
        // The second predicate would fail on a non-container, but the first
        // one already rejects every record.
        let query = Query::new()
            .with("name", "nobody")
            .with("name__in", 5);
        let matched = QueryFilter::new(&query).unwrap().apply(users()).unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn all_predicates_must_hold() {
        let records = vec![
            record(json!({"code": "MC102", "year": 2016})),
            record(json!({"code": "MC102", "year": 2017})),
            record(json!({"code": "MA111", "year": 2016})),
        ];
        let query = Query::new().with("code", "MC102").with("year", 2016);
        let matched = QueryFilter::new(&query).unwrap().apply(records).unwrap();
        assert_eq!(matched, vec![record(json!({"code": "MC102", "year": 2016}))]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut query = Query::new().with("a", 1).with("b", 2);
        query.insert("a", 3);
        assert_eq!(query.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(query.get("a"), Some(&json!(3)));
    }

    #[rstest]
    #[case::number("year=2016", "year", json!(2016))]
    #[case::plain_string("name=lucas", "name", json!("lucas"))]
    #[case::json_array("name__in=[\"a\",\"b\"]", "name__in", json!(["a", "b"]))]
    #[case::equals_in_value("expr=a=b", "expr", json!("a=b"))]
    #[case::empty_value("name=", "name", json!(""))]
    fn parses_conditions(#[case] condition: &str, #[case] key: &str, #[case] value: Value) {
        let mut query = Query::new();
        query.insert_condition(condition).unwrap();
        assert_eq!(query.get(key), Some(&value));
    }

    #[rstest]
    #[case::no_equals("name")]
    #[case::empty_key("=value")]
    fn rejects_malformed_conditions(#[case] condition: &str) {
        let mut query = Query::new();
        assert!(matches!(
            query.insert_condition(condition),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn without_drops_keys() {
        let query = Query::new().with("term", "2016s1").with("code", "MC102");
        let rest = query.without(&["term"]);
        assert_eq!(rest.keys().collect::<Vec<_>>(), ["code"]);
        assert_eq!(query.len(), 2);
    }
}
