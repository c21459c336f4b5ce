//! # Full-Text Query Module
//!
//! ## Purpose
//! Builders for analyzed-text queries: match, match_phrase and
//! match_phrase_prefix.
//!
//! ## Input/Output Specification
//! - **Input**: Field names, query text and analysis options
//! - **Output**: `{"<tag>": {"<field>": <text-or-options>}}` fragments
//! - **Validation**: `field` and `query` are required at serialization time;
//!   operators and zero-terms statuses are validated at set time

use serde_json::Value;

use crate::errors::{BuilderError, Result};
use crate::query::{query_common, serialize_field_leaf, Query};
use crate::serializer::{Body, Serializable};

/// The standard query for full-text search on an analyzed field.
#[derive(Debug, Default)]
pub struct MatchQuery {
    field: Option<String>,
    body: Body,
}

impl MatchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the text to search with.
    pub fn query(mut self, query: impl Into<Value>) -> Self {
        self.body.insert("query", query);
        self
    }

    /// Frequency above which terms are moved into a secondary sub-query.
    pub fn cutoff_frequency(mut self, frequency: f64) -> Self {
        self.body.insert("cutoff_frequency", frequency);
        self
    }

    /// The maximum edit distance, either a number or `AUTO`.
    pub fn fuzziness(mut self, factor: impl Into<Value>) -> Self {
        self.body.insert("fuzziness", factor);
        self
    }

    /// Ignores data-type mismatch exceptions, such as querying a numeric
    /// field with a text string.
    pub fn lenient(mut self, status: bool) -> Self {
        self.body.insert("lenient", status);
        self
    }

    /// The maximum number of terms that the fuzzy expansion will produce.
    pub fn max_expansions(mut self, limit: u64) -> Self {
        self.body.insert("max_expansions", limit);
        self
    }

    /// Boolean logic used to combine the analyzed terms. Lowercased and
    /// validated eagerly against `and` / `or`.
    pub fn operator(mut self, operator: &str) -> Result<Self> {
        let operator_lower = operator.to_lowercase();

        if operator_lower != "and" && operator_lower != "or" {
            return Err(BuilderError::InvalidValue {
                value: operator.to_string(),
                attribute: "operator",
            });
        }

        self.body.insert("operator", operator_lower);
        Ok(self)
    }

    /// The number of initial characters which will not be "fuzzified".
    pub fn prefix_length(mut self, length: u64) -> Self {
        self.body.insert("prefix_length", length);
        self
    }

    query_common!();
}

impl Serializable for MatchQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("match", self.field.as_deref(), &self.body, "query")
    }
}

impl Query for MatchQuery {}

/// Matches documents containing the query text as an exact phrase.
#[derive(Default)]
pub struct MatchPhraseQuery {
    field: Option<String>,
    body: Body,
}

impl MatchPhraseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the phrase to search with.
    pub fn query(mut self, query: impl Into<Value>) -> Self {
        self.body.insert("query", query);
        self
    }

    query_common!();
}

impl Serializable for MatchPhraseQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("match_phrase", self.field.as_deref(), &self.body, "query")
    }
}

impl Query for MatchPhraseQuery {}

/// Like `match_phrase`, but the last term is matched as a prefix.
#[derive(Debug, Default)]
pub struct MatchPhrasePrefixQuery {
    field: Option<String>,
    body: Body,
}

impl MatchPhrasePrefixQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the phrase to search with.
    pub fn query(mut self, query: impl Into<Value>) -> Self {
        self.body.insert("query", query);
        self
    }

    /// Analyzer used to convert the query text into tokens.
    pub fn analyzer(mut self, analyzer: &str) -> Self {
        self.body.insert("analyzer", analyzer);
        self
    }

    /// Maximum number of terms to which the last term will expand.
    pub fn max_expansions(mut self, max_expansions: u64) -> Self {
        self.body.insert("max_expansions", max_expansions);
        self
    }

    /// Maximum number of positions allowed between matching tokens.
    pub fn slop(mut self, slop: u64) -> Self {
        self.body.insert("slop", slop);
        self
    }

    /// Behavior when the analyzer removes all tokens. Validated eagerly
    /// against `none` / `all`.
    pub fn zero_terms_query(mut self, status: &str) -> Result<Self> {
        let status_lower = status.to_lowercase();

        if status_lower != "none" && status_lower != "all" {
            return Err(BuilderError::InvalidValue {
                value: status.to_string(),
                attribute: "zero terms query status",
            });
        }

        self.body.insert("zero_terms_query", status_lower);
        Ok(self)
    }

    query_common!();
}

impl Serializable for MatchPhrasePrefixQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf(
            "match_phrase_prefix",
            self.field.as_deref(),
            &self.body,
            "query",
        )
    }
}

impl Query for MatchPhrasePrefixQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_query_collapses_single_query_key() {
        let query = MatchQuery::new().field("message").query("this is a test");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"match": {"message": "this is a test"}})
        );
    }

    #[test]
    fn test_match_query_expands_with_options() {
        let query = MatchQuery::new()
            .field("message")
            .query("this is a test")
            .operator("and")
            .unwrap();
        assert_eq!(
            query.serialize().unwrap(),
            json!({"match": {"message": {"query": "this is a test", "operator": "and"}}})
        );
    }

    #[test]
    fn test_match_query_rejects_invalid_operator_at_set_time() {
        let error = MatchQuery::new().operator("xor").unwrap_err();
        assert_eq!(error.to_string(), "The [xor] operator is invalid!");
    }

    #[test]
    fn test_match_query_requires_query() {
        let error = MatchQuery::new().field("message").serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"query\" is required!");
    }

    #[test]
    fn test_match_phrase_query() {
        let query = MatchPhraseQuery::new().field("message").query("quick fox");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"match_phrase": {"message": "quick fox"}})
        );
    }

    #[test]
    fn test_match_phrase_prefix_query_with_options() {
        let query = MatchPhrasePrefixQuery::new()
            .field("message")
            .query("quick brown f")
            .max_expansions(10);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"match_phrase_prefix": {"message": {
                "query": "quick brown f",
                "max_expansions": 10
            }}})
        );
    }

    #[test]
    fn test_zero_terms_query_validation() {
        let error = MatchPhrasePrefixQuery::new()
            .zero_terms_query("some")
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "The [some] zero terms query status is invalid!"
        );
    }
}
