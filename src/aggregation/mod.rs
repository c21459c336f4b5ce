//! # Aggregation Module
//!
//! ## Purpose
//! Builder types for the `aggs` section of a search request body. Every
//! aggregation carries the shared nesting compositor: a required name, an
//! optional metadata map and a list of nested child aggregations.
//!
//! ## Input/Output Specification
//! - **Input**: A name, type-specific options and optional child aggregations
//! - **Output**: `{"<name>": {"<tag>": {...}, "aggs"?: {...}, "meta"?: {...}}}`
//! - **Validation**: The name check always runs before any type-specific
//!   field check
//!
//! ## Key Features
//! - Nested aggregations merge flat under a single `aggs` key; a later
//!   child reusing a name overwrites the earlier fragment
//! - `meta` is emitted only when metadata was set

pub mod bucketing;
pub mod metrics;

use serde_json::{Map, Value};

use crate::errors::{BuilderError, Result};
use crate::serializer::{tagged, Serializable};

pub use bucketing::TermsAggregation;
pub use metrics::{
    AvgAggregation, CardinalityAggregation, MaxAggregation, MinAggregation, SumAggregation,
    TopHitsAggregation,
};

/// Marker trait for builder nodes that may appear in the `aggs` section
/// or nested inside another aggregation.
pub trait Aggregation: Serializable {}

/// Shared naming/nesting state embedded in every aggregation type.
#[derive(Default)]
pub struct AggregationBase {
    name: Option<String>,
    meta: Map<String, Value>,
    nested: Vec<Box<dyn Aggregation>>,
}

impl std::fmt::Debug for AggregationBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationBase")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("nested", &format_args!("len={}", self.nested.len()))
            .finish()
    }
}

impl AggregationBase {
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub fn set_meta(&mut self, meta: Map<String, Value>) {
        self.meta = meta;
    }

    pub fn add_nested(&mut self, aggregation: Box<dyn Aggregation>) {
        self.nested.push(aggregation);
    }

    /// Wraps a tagged body under the aggregation's name, attaching the
    /// merged `aggs` and `meta` sections. The `tag_body` closure runs after
    /// the name check so naming errors always win.
    pub fn wrap<F>(&self, tag_body: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        let name = self
            .name
            .as_deref()
            .ok_or(BuilderError::MissingRequiredAttribute {
                type_name: "Aggregation",
                attribute: "name",
            })?;

        let mut body = match tag_body()? {
            Value::Object(entries) => entries,
            other => {
                let mut entries = Map::new();
                entries.insert("value".to_string(), other);
                entries
            }
        };

        if !self.nested.is_empty() {
            let mut merged = Map::new();
            for nested in &self.nested {
                if let Value::Object(fragment) = nested.serialize()? {
                    for (key, value) in fragment {
                        merged.insert(key, value);
                    }
                }
            }
            body.insert("aggs".to_string(), Value::Object(merged));
        }

        if !self.meta.is_empty() {
            body.insert("meta".to_string(), Value::Object(self.meta.clone()));
        }

        Ok(tagged(name, Value::Object(body)))
    }
}

/// Generates the naming/nesting setters shared by every aggregation type.
macro_rules! aggregation_common {
    () => {
        /// Names the aggregation; the name keys its fragment in the output.
        pub fn name(mut self, name: &str) -> Self {
            self.base.set_name(name);
            self
        }

        /// Attaches arbitrary metadata, emitted under `meta`.
        pub fn meta(mut self, meta: serde_json::Map<String, serde_json::Value>) -> Self {
            self.base.set_meta(meta);
            self
        }

        /// Nests a child aggregation under this one.
        pub fn aggregation(
            mut self,
            aggregation: impl $crate::aggregation::Aggregation + 'static,
        ) -> Self {
            self.base.add_nested(Box::new(aggregation));
            self
        }

        /// Nests several child aggregations under this one.
        pub fn aggregations(
            mut self,
            aggregations: Vec<Box<dyn $crate::aggregation::Aggregation>>,
        ) -> Self {
            for aggregation in aggregations {
                self.base.add_nested(aggregation);
            }
            self
        }
    };
}

pub(crate) use aggregation_common;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrap_requires_a_name() {
        let base = AggregationBase::default();
        let error = base.wrap(|| Ok(json!({"terms": {}}))).unwrap_err();
        assert_eq!(error.to_string(), "The Aggregation \"name\" is required!");
    }

    #[test]
    fn test_name_check_runs_before_the_body_is_built() {
        let base = AggregationBase::default();
        let error = base
            .wrap(|| Err(BuilderError::MissingRequiredField("field")))
            .unwrap_err();
        assert_eq!(error.to_string(), "The Aggregation \"name\" is required!");
    }

    #[test]
    fn test_wrap_keys_the_body_by_name() {
        let mut base = AggregationBase::default();
        base.set_name("genres");
        let value = base
            .wrap(|| Ok(json!({"terms": {"field": "genre"}})))
            .unwrap();
        assert_eq!(value, json!({"genres": {"terms": {"field": "genre"}}}));
    }

    #[test]
    fn test_meta_is_emitted_only_when_set() {
        let mut base = AggregationBase::default();
        base.set_name("genres");

        let without = base.wrap(|| Ok(json!({"terms": {}}))).unwrap();
        assert!(without["genres"].get("meta").is_none());

        let mut meta = Map::new();
        meta.insert("color".to_string(), json!("blue"));
        base.set_meta(meta);

        let with = base.wrap(|| Ok(json!({"terms": {}}))).unwrap();
        assert_eq!(with["genres"]["meta"], json!({"color": "blue"}));
    }
}
