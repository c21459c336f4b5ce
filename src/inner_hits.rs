//! # Inner Hits Module
//!
//! ## Purpose
//! Builder for the `inner_hits` definition attached to field collapsing
//! and nested queries. All options are optional; an empty definition
//! serializes to `{}`.

use serde_json::Value;

use crate::errors::Result;
use crate::highlight::Highlight;
use crate::serializer::{Body, Serializable};
use crate::sort::Sort;

/// Definition of the inner hits returned alongside a parent hit.
#[derive(Default)]
pub struct InnerHits {
    body: Body,
}

impl InnerHits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the first inner hit to fetch.
    pub fn from(mut self, from: u64) -> Self {
        self.body.insert("from", from);
        self
    }

    /// Name used for this definition in the response.
    pub fn name(mut self, name: &str) -> Self {
        self.body.insert("name", name);
        self
    }

    /// Maximum number of inner hits to return.
    pub fn size(mut self, size: u64) -> Self {
        self.body.insert("size", size);
        self
    }

    /// Appends a sort criterion for the inner hits.
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

    /// Highlights the inner hits.
    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.body.insert_node("highlight", highlight);
        self
    }

    /// Explains how each inner hit's score was computed.
    pub fn explain(mut self, status: bool) -> Self {
        self.body.insert("explain", status);
        self
    }

    /// Controls how the `_source` field is returned with every inner hit.
    pub fn source(mut self, source: impl Into<Value>) -> Self {
        self.body.insert("_source", source);
        self
    }

    /// Returns the doc-value representation of a field for each inner hit.
    pub fn docvalue_field(mut self, field: &str, format: Option<&str>) -> Self {
        let entry = match format {
            Some(format) => serde_json::json!({"field": field, "format": format}),
            None => Value::String(field.to_string()),
        };
        self.body.push("docvalue_fields", entry);
        self
    }

    /// Returns a version number for each inner hit.
    pub fn version(mut self, status: bool) -> Self {
        self.body.insert("version", status);
        self
    }
}

impl Serializable for InnerHits {
    fn serialize(&self) -> Result<Value> {
        self.body.to_value()
    }
}
