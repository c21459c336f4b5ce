//! # Metrics Aggregation Module
//!
//! ## Purpose
//! Builders for metric aggregations, which compute values over the
//! documents in a bucket.

use serde_json::Value;

use crate::aggregation::{aggregation_common, Aggregation, AggregationBase};
use crate::errors::{BuilderError, Result};
use crate::highlight::Highlight;
use crate::script::Script;
use crate::serializer::{tagged, Body, Serializable};
use crate::sort::Sort;

/// Generates a single-field numeric metric aggregation.
macro_rules! field_metric {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Default)]
        pub struct $name {
            base: AggregationBase,
            body: Body,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            aggregation_common!();

            /// Sets the field to aggregate over.
            pub fn field(mut self, field: &str) -> Self {
                self.body.insert("field", field);
                self
            }

            /// Value to use for documents that lack the field.
            pub fn missing(mut self, value: impl Into<Value>) -> Self {
                self.body.insert("missing", value);
                self
            }
        }

        impl Serializable for $name {
            fn serialize(&self) -> Result<Value> {
                self.base.wrap(|| {
                    if !self.body.contains("field") {
                        return Err(BuilderError::MissingRequiredField("field"));
                    }
                    Ok(tagged($tag, self.body.to_value()?))
                })
            }
        }

        impl Aggregation for $name {}
    };
}

field_metric!(
    /// Computes the average of a numeric field.
    AvgAggregation,
    "avg"
);

field_metric!(
    /// Returns the maximum value of a numeric field.
    MaxAggregation,
    "max"
);

field_metric!(
    /// Returns the minimum value of a numeric field.
    MinAggregation,
    "min"
);

field_metric!(
    /// Sums the values of a numeric field.
    SumAggregation,
    "sum"
);

/// Approximates the count of distinct field values.
#[derive(Debug, Default)]
pub struct CardinalityAggregation {
    base: AggregationBase,
    body: Body,
}

impl CardinalityAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    aggregation_common!();

    /// Sets the field to count distinct values of.
    pub fn field(mut self, field: &str) -> Self {
        self.body.insert("field", field);
        self
    }

    /// Unique count below which results are expected to be close to
    /// accurate. Capped at 40000 and checked eagerly.
    pub fn precision(mut self, threshold: u32) -> Result<Self> {
        if threshold > 40_000 {
            return Err(BuilderError::PrecisionThresholdTooLarge);
        }

        self.body.insert("precision_threshold", threshold);
        Ok(self)
    }
}

impl Serializable for CardinalityAggregation {
    fn serialize(&self) -> Result<Value> {
        self.base.wrap(|| {
            if !self.body.contains("field") {
                return Err(BuilderError::MissingRequiredField("field"));
            }
            Ok(tagged("cardinality", self.body.to_value()?))
        })
    }
}

impl Aggregation for CardinalityAggregation {}

/// Returns the top matching documents per bucket.
#[derive(Default)]
pub struct TopHitsAggregation {
    base: AggregationBase,
    body: Body,
}

impl TopHitsAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    aggregation_common!();

    /// Offset of the first hit to return.
    pub fn from(mut self, from: u64) -> Self {
        self.body.insert("from", from);
        self
    }

    /// The number of hits to return.
    pub fn size(mut self, size: u64) -> Self {
        self.body.insert("size", size);
        self
    }

    /// Appends a sort criterion for the returned hits.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.body.push_node("sort", sort);
        self
    }

    /// Appends several sort criteria.
    pub fn sorts(mut self, sorts: Vec<Sort>) -> Self {
        for sort in sorts {
            self.body.push_node("sort", sort);
        }
        self
    }

    /// Computes scores even when sorting on a field.
    pub fn track_scores(mut self, status: bool) -> Self {
        self.body.insert("track_scores", status);
        self
    }

    /// Returns a version number for each hit.
    pub fn version(mut self, status: bool) -> Self {
        self.body.insert("version", status);
        self
    }

    /// Explains how each hit's score was computed.
    pub fn explain(mut self, status: bool) -> Self {
        self.body.insert("explain", status);
        self
    }

    /// Highlights search results on one or more fields.
    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.body.insert_node("highlight", highlight);
        self
    }

    /// Controls how the `_source` field is returned with every hit.
    pub fn source(mut self, source: impl Into<Value>) -> Self {
        self.body.insert("_source", source);
        self
    }

    /// Selects the stored fields to return.
    pub fn stored_fields(mut self, fields: impl Into<Value>) -> Self {
        self.body.insert("stored_fields", fields);
        self
    }

    /// Returns a script evaluation for each hit under `name`.
    pub fn script_field(mut self, name: &str, script: Script) -> Self {
        self.body.insert_named_node("script_fields", name, script);
        self
    }

    /// Returns the doc-value representation of a field for each hit.
    pub fn docvalue_field(mut self, field: &str, format: Option<&str>) -> Self {
        let entry = match format {
            Some(format) => {
                serde_json::json!({"field": field, "format": format})
            }
            None => Value::String(field.to_string()),
        };
        self.body.push("docvalue_fields", entry);
        self
    }
}

impl Serializable for TopHitsAggregation {
    fn serialize(&self) -> Result<Value> {
        self.base
            .wrap(|| Ok(tagged("top_hits", self.body.to_value()?)))
    }
}

impl Aggregation for TopHitsAggregation {}
