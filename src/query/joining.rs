//! # Joining Query Module
//!
//! ## Purpose
//! Builders for queries over documents with nested-object mappings.

use serde_json::Value;

use crate::errors::{BuilderError, Result};
use crate::query::{query_common, Query};
use crate::serializer::{tagged, Body, Serializable};

const SCORE_MODES: [&str; 5] = ["avg", "max", "min", "none", "sum"];

/// Wraps a child query and runs it against nested-object sub-documents
/// under `path`.
#[derive(Debug, Default)]
pub struct NestedQuery {
    body: Body,
}

impl NestedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to the nested-object field to search.
    pub fn path(mut self, path: &str) -> Self {
        self.body.insert("path", path);
        self
    }

    /// The query to run against the nested objects.
    pub fn query(mut self, query: impl Query + 'static) -> Self {
        self.body.insert_node("query", query);
        self
    }

    /// How scores of matching nested objects roll up to the root document.
    /// Lowercased and validated eagerly.
    pub fn score_mode(mut self, mode: &str) -> Result<Self> {
        let mode_lower = mode.to_lowercase();

        if !SCORE_MODES.contains(&mode_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: mode.to_string(),
                attribute: "score mode",
            });
        }

        self.body.insert("score_mode", mode_lower);
        Ok(self)
    }

    /// Ignores paths absent from the mapping instead of failing the search.
    pub fn ignore_unmapped(mut self, status: bool) -> Self {
        self.body.insert("ignore_unmapped", status);
        self
    }

    query_common!();
}

impl Serializable for NestedQuery {
    fn serialize(&self) -> Result<Value> {
        if !self.body.contains("path") {
            return Err(BuilderError::MissingRequiredField("path"));
        }
        if !self.body.contains("query") {
            return Err(BuilderError::MissingRequiredField("query"));
        }

        Ok(tagged("nested", self.body.to_value()?))
    }
}

impl Query for NestedQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::term_level::TermQuery;
    use serde_json::json;

    #[test]
    fn test_nested_query() {
        let query = NestedQuery::new()
            .path("comments")
            .query(TermQuery::new().field("comments.author").value("kim"));
        assert_eq!(
            query.serialize().unwrap(),
            json!({"nested": {
                "path": "comments",
                "query": {"term": {"comments.author": "kim"}}
            }})
        );
    }

    #[test]
    fn test_nested_query_with_score_mode() {
        let query = NestedQuery::new()
            .path("comments")
            .query(TermQuery::new().field("comments.author").value("kim"))
            .score_mode("AVG")
            .unwrap()
            .ignore_unmapped(true);

        let serialized = query.serialize().unwrap();
        assert_eq!(serialized["nested"]["score_mode"], json!("avg"));
        assert_eq!(serialized["nested"]["ignore_unmapped"], json!(true));
    }

    #[test]
    fn test_nested_query_rejects_invalid_score_mode() {
        let error = NestedQuery::new().score_mode("mean").unwrap_err();
        assert_eq!(error.to_string(), "The [mean] score mode is invalid!");
    }

    #[test]
    fn test_nested_query_requires_path() {
        let error = NestedQuery::new()
            .query(TermQuery::new().field("a").value(1))
            .serialize()
            .unwrap_err();
        assert_eq!(error.to_string(), "The \"path\" is required!");
    }

    #[test]
    fn test_nested_query_requires_query() {
        let error = NestedQuery::new().path("comments").serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"query\" is required!");
    }
}
