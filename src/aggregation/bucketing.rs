//! # Bucketing Aggregation Module
//!
//! ## Purpose
//! Builders for bucket aggregations, which group documents into sets by
//! field value.

use serde_json::Value;

use crate::aggregation::{aggregation_common, Aggregation, AggregationBase};
use crate::errors::{BuilderError, Result};
use crate::script::Script;
use crate::serializer::{tagged, Body, Serializable};

const COLLECT_MODES: [&str; 2] = ["breadth_first", "depth_first"];

const EXECUTION_HINTS: [&str; 4] = [
    "map",
    "global_ordinals",
    "global_ordinals_hash",
    "global_ordinals_low_cardinality",
];

/// Buckets documents by the distinct values of a field.
#[derive(Debug, Default)]
pub struct TermsAggregation {
    base: AggregationBase,
    body: Body,
}

impl TermsAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    aggregation_common!();

    /// Sets the field to bucket on.
    pub fn field(mut self, field: &str) -> Self {
        self.body.insert("field", field);
        self
    }

    /// How child aggregations are computed. Lowercased and validated
    /// eagerly against `breadth_first` / `depth_first`.
    pub fn collect_mode(mut self, mode: &str) -> Result<Self> {
        let mode_lower = mode.to_lowercase();

        if !COLLECT_MODES.contains(&mode_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: mode.to_string(),
                attribute: "mode",
            });
        }

        self.body.insert("collect_mode", mode_lower);
        Ok(self)
    }

    /// Appends a bucket ordering criterion.
    pub fn order(mut self, key: &str, direction: &str) -> Self {
        self.body.push("order", tagged(key, direction.into()));
        self
    }

    /// Generates the bucket keys with a script instead of a field.
    pub fn script(mut self, script: Script) -> Self {
        self.body.insert_node("script", script);
        self
    }

    /// How many buckets to return.
    pub fn size(mut self, size: u64) -> Self {
        self.body.insert("size", size);
        self
    }

    /// How many buckets each shard returns for reduction.
    pub fn shard_size(mut self, size: u64) -> Self {
        self.body.insert("shard_size", size);
        self
    }

    /// Reports the per-bucket upper bound of the document count error.
    pub fn show_term_doc_count_error(mut self, status: bool) -> Self {
        self.body.insert("show_term_doc_count_error", status);
        self
    }

    /// Minimum document count for a bucket to be returned.
    pub fn min_doc_count(mut self, count: u64) -> Self {
        self.body.insert("min_doc_count", count);
        self
    }

    /// Minimum per-shard document count for a bucket to be considered.
    pub fn shard_min_doc_count(mut self, count: u64) -> Self {
        self.body.insert("shard_min_doc_count", count);
        self
    }

    /// Regular expression or value list selecting the buckets to keep.
    pub fn include(mut self, clause: impl Into<Value>) -> Self {
        self.body.insert("include", clause);
        self
    }

    /// Regular expression or value list selecting the buckets to drop.
    pub fn exclude(mut self, clause: impl Into<Value>) -> Self {
        self.body.insert("exclude", clause);
        self
    }

    /// Value to bucket documents that lack the field under.
    pub fn missing(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("missing", value);
        self
    }

    /// Mechanism used to collect terms. Lowercased and validated eagerly.
    pub fn execution_hint(mut self, hint: &str) -> Result<Self> {
        let hint_lower = hint.to_lowercase();

        if !EXECUTION_HINTS.contains(&hint_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: hint.to_string(),
                attribute: "hint",
            });
        }

        self.body.insert("execution_hint", hint_lower);
        Ok(self)
    }
}

impl Serializable for TermsAggregation {
    fn serialize(&self) -> Result<Value> {
        self.base.wrap(|| {
            if !self.body.contains("field") {
                return Err(BuilderError::MissingRequiredField("field"));
            }
            Ok(tagged("terms", self.body.to_value()?))
        })
    }
}

impl Aggregation for TermsAggregation {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::metrics::AvgAggregation;
    use serde_json::json;

    #[test]
    fn test_terms_aggregation() {
        let aggregation = TermsAggregation::new().name("genres").field("genre");
        assert_eq!(
            aggregation.serialize().unwrap(),
            json!({"genres": {"terms": {"field": "genre"}}})
        );
    }

    #[test]
    fn test_terms_aggregation_requires_name_before_field() {
        let error = TermsAggregation::new().serialize().unwrap_err();
        assert_eq!(error.to_string(), "The Aggregation \"name\" is required!");
    }

    #[test]
    fn test_terms_aggregation_requires_field() {
        let error = TermsAggregation::new().name("genres").serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"field\" is required!");
    }

    #[test]
    fn test_terms_aggregation_order_appends() {
        let aggregation = TermsAggregation::new()
            .name("genres")
            .field("genre")
            .order("_count", "asc")
            .order("_key", "desc");
        assert_eq!(
            aggregation.serialize().unwrap(),
            json!({"genres": {"terms": {
                "field": "genre",
                "order": [{"_count": "asc"}, {"_key": "desc"}]
            }}})
        );
    }

    #[test]
    fn test_terms_aggregation_rejects_invalid_collect_mode() {
        let error = TermsAggregation::new().collect_mode("eager").unwrap_err();
        assert_eq!(error.to_string(), "The [eager] mode is invalid!");
    }

    #[test]
    fn test_terms_aggregation_rejects_invalid_execution_hint() {
        let error = TermsAggregation::new().execution_hint("fast").unwrap_err();
        assert_eq!(error.to_string(), "The [fast] hint is invalid!");
    }

    #[test]
    fn test_terms_aggregation_with_nested_child() {
        let aggregation = TermsAggregation::new()
            .name("genres")
            .field("genre")
            .aggregation(AvgAggregation::new().name("avg_rating").field("rating"));
        assert_eq!(
            aggregation.serialize().unwrap(),
            json!({"genres": {
                "terms": {"field": "genre"},
                "aggs": {"avg_rating": {"avg": {"field": "rating"}}}
            }})
        );
    }

    #[test]
    fn test_nested_duplicate_name_overwrites() {
        let aggregation = TermsAggregation::new()
            .name("genres")
            .field("genre")
            .aggregation(AvgAggregation::new().name("stat").field("rating"))
            .aggregation(AvgAggregation::new().name("stat").field("price"));

        let serialized = aggregation.serialize().unwrap();
        assert_eq!(
            serialized["genres"]["aggs"],
            json!({"stat": {"avg": {"field": "price"}}})
        );
    }

    #[test]
    fn test_terms_aggregation_with_script() {
        let aggregation = TermsAggregation::new()
            .name("genres")
            .field("genre")
            .script(Script::new().source("doc['genre'].value"));

        let serialized = aggregation.serialize().unwrap();
        assert_eq!(
            serialized["genres"]["terms"]["script"],
            json!({"source": "doc['genre'].value"})
        );
    }
}
