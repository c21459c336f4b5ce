//! # Search Builder Module
//!
//! ## Purpose
//! Top-level builder assembling a complete search request body from
//! queries, aggregations, sorts, highlighting and pagination options.
//!
//! ## Input/Output Specification
//! - **Input**: Request-level options plus attached query and aggregation
//!   nodes
//! - **Output**: The full request body; scalar options first, then the
//!   merged `query` section, then the merged `aggs` section
//! - **Validation**: Attached sub-trees are resolved when the builder is
//!   serialized, so their presence checks fire at the same time as
//!   everything else
//!
//! ## Key Features
//! - Multiple attached queries merge their single-key fragments into one
//!   `query` object; a later fragment reusing a key overwrites the earlier
//! - Aggregations merge the same way under `aggs`

use serde_json::{Map, Value};
use tracing::debug;

use crate::aggregation::Aggregation;
use crate::errors::{BuilderError, Result};
use crate::highlight::Highlight;
use crate::inner_hits::InnerHits;
use crate::query::Query;
use crate::script::Script;
use crate::serializer::{Body, Serializable};
use crate::sort::Sort;

const SEARCH_TYPES: [&str; 2] = ["dfs_query_then_fetch", "query_then_fetch"];

struct Collapse {
    field: String,
    inner_hits: Option<InnerHits>,
    max_concurrent_group_searches: Option<u64>,
}

impl Serializable for Collapse {
    fn serialize(&self) -> Result<Value> {
        let mut resolved = Map::new();
        resolved.insert("field".to_string(), Value::String(self.field.clone()));

        if let Some(inner_hits) = &self.inner_hits {
            resolved.insert("inner_hits".to_string(), inner_hits.serialize()?);

            if let Some(limit) = self.max_concurrent_group_searches {
                resolved.insert("max_concurrent_group_searches".to_string(), limit.into());
            }
        }

        Ok(Value::Object(resolved))
    }
}

/// Builder for a complete search request body.
#[derive(Default)]
pub struct SearchBuilder {
    body: Body,
    queries: Vec<Box<dyn Query>>,
    aggregations: Vec<Box<dyn Aggregation>>,
}

impl std::fmt::Debug for SearchBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBuilder")
            .field("body", &self.body)
            .field("queries", &format_args!("len={}", self.queries.len()))
            .field(
                "aggregations",
                &format_args!("len={}", self.aggregations.len()),
            )
            .finish()
    }
}

impl SearchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the doc-value representation of a field for each hit.
    pub fn docvalue_field(mut self, field: &str, format: Option<&str>) -> Self {
        let entry = match format {
            Some(format) => serde_json::json!({"field": field, "format": format}),
            None => Value::String(field.to_string()),
        };
        self.body.push("docvalue_fields", entry);
        self
    }

    /// Explains how each hit's score was computed.
    pub fn explain(mut self, status: bool) -> Self {
        self.body.insert("explain", status);
        self
    }

    /// Collapses results on a field, keeping the top sorted document per
    /// collapse key. `max_concurrent_group_searches` is only emitted when
    /// inner hits are requested.
    pub fn collapse(
        mut self,
        field: &str,
        inner_hits: Option<InnerHits>,
        max_concurrent_group_searches: Option<u64>,
    ) -> Self {
        self.body.insert_node(
            "collapse",
            Collapse {
                field: field.to_string(),
                inner_hits,
                max_concurrent_group_searches,
            },
        );
        self
    }

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

    /// Highlights search results on one or more fields.
    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.body.insert_node("highlight", highlight);
        self
    }

    /// Excludes documents scoring below the given minimum.
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.body.insert("min_score", min_score);
        self
    }

    /// Returns a script evaluation for each hit under `name`.
    pub fn script_field(mut self, name: &str, script: Script) -> Self {
        self.body.insert_named_node("script_fields", name, script);
        self
    }

    /// Uses the sort values of the previous page's last hit to fetch the
    /// next page.
    pub fn search_after(mut self, values: Vec<Value>) -> Self {
        self.body.insert("search_after", Value::Array(values));
        self
    }

    /// Bounds the request to the given time, returning accumulated hits
    /// on expiry.
    pub fn timeout(mut self, timeout: impl Into<Value>) -> Self {
        self.body.insert("timeout", timeout);
        self
    }

    /// The type of search operation to perform. Lowercased and validated
    /// eagerly against `dfs_query_then_fetch` / `query_then_fetch`.
    pub fn search_type(mut self, search_type: &str) -> Result<Self> {
        let type_lower = search_type.to_lowercase();

        if !SEARCH_TYPES.contains(&type_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: search_type.to_string(),
                attribute: "type",
            });
        }

        self.body.insert("search_type", type_lower);
        Ok(self)
    }

    /// Maximum number of documents to collect per shard before
    /// terminating early.
    pub fn terminate_after(mut self, number_of_docs: u64) -> Self {
        self.body.insert("terminate_after", number_of_docs);
        self
    }

    /// Appends a sort criterion.
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

    /// Controls how the source document is returned with every hit.
    pub fn source(mut self, source: impl Into<Value>) -> Self {
        self.body.insert("source", source);
        self
    }

    /// Attaches a query; several attached queries merge their fragments
    /// into one `query` object.
    pub fn query(mut self, query: impl Query + 'static) -> Self {
        self.queries.push(Box::new(query));
        self
    }

    /// Attaches an aggregation; fragments merge into one `aggs` object.
    pub fn aggregation(mut self, aggregation: impl Aggregation + 'static) -> Self {
        self.aggregations.push(Box::new(aggregation));
        self
    }
}

impl Serializable for SearchBuilder {
    fn serialize(&self) -> Result<Value> {
        let mut resolved = self.body.to_map()?;

        if !self.queries.is_empty() {
            let mut merged = Map::new();
            for query in &self.queries {
                if let Value::Object(fragment) = query.serialize()? {
                    for (key, value) in fragment {
                        merged.insert(key, value);
                    }
                }
            }
            resolved.insert("query".to_string(), Value::Object(merged));
        }

        if !self.aggregations.is_empty() {
            let mut merged = Map::new();
            for aggregation in &self.aggregations {
                if let Value::Object(fragment) = aggregation.serialize()? {
                    for (key, value) in fragment {
                        merged.insert(key, value);
                    }
                }
            }
            resolved.insert("aggs".to_string(), Value::Object(merged));
        }

        debug!(
            sections = resolved.len(),
            queries = self.queries.len(),
            aggregations = self.aggregations.len(),
            "serialized search request body"
        );

        Ok(Value::Object(resolved))
    }
}
