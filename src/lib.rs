//! # Elasticsearch Query Builder
//!
//! ## Overview
//! This library provides fluent builders for assembling Elasticsearch
//! query-DSL request bodies as nested JSON, with validation of required
//! fields at serialization time and of fixed value sets at set time.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `serializer`: The recursive serialization contract shared by all nodes
//! - `search`: Top-level builder for a complete search request body
//! - `query`: Term-level, full-text, compound, joining and span queries
//! - `aggregation`: Bucketing and metrics aggregations with nesting
//! - `sort`: Field and geo-distance sort criteria
//! - `script`: Inline and stored script references
//! - `highlight`: Global and per-field highlighting options
//! - `inner_hits`: Inner hit definitions for collapsing and nested queries
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Fluent setter chains describing a search request
//! - **Output**: Nested `serde_json::Value` trees and JSON text (compact or
//!   4-space pretty-printed)
//! - **Guarantees**: Deterministic key order, empty collections emitted as
//!   `{}`, serialization never mutates a builder
//!
//! ## Usage
//! ```rust
//! use elastic_query_builder::prelude::*;
//!
//! fn main() -> elastic_query_builder::errors::Result<()> {
//!     let body = SearchBuilder::new()
//!         .size(10)
//!         .query(
//!             BoolQuery::new()
//!                 .must(MatchQuery::new().field("title").query("rust"))
//!                 .filter(TermQuery::new().field("status").value("published")),
//!         )
//!         .sort(Sort::new().field("published_at").order("desc")?);
//!     println!("{}", body.serialize_to_text(true)?);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod errors;
pub mod serializer;
pub mod search;
pub mod query;
pub mod aggregation;
pub mod sort;
pub mod script;
pub mod highlight;
pub mod inner_hits;

// Re-exports for convenience
pub use errors::{BuilderError, Result};
pub use search::SearchBuilder;
pub use serializer::Serializable;

/// Single-import surface covering the common builder types.
pub mod prelude {
    pub use crate::aggregation::{
        Aggregation, AvgAggregation, CardinalityAggregation, MaxAggregation, MinAggregation,
        SumAggregation, TermsAggregation, TopHitsAggregation,
    };
    pub use crate::highlight::Highlight;
    pub use crate::inner_hits::InnerHits;
    pub use crate::query::{
        BoolQuery, BoostingQuery, ConstantScoreQuery, DisMaxQuery, ExistsQuery, FuzzyQuery,
        IdsQuery, MatchAllQuery, MatchNoneQuery, MatchPhrasePrefixQuery, MatchPhraseQuery,
        MatchQuery, NestedQuery, PrefixQuery, Query, RangeQuery, RegexpQuery, SpanNearQuery,
        SpanOrQuery, SpanQuery, SpanTermQuery, TermQuery, TermsQuery, TermsSetQuery, TypeQuery,
        WildcardQuery,
    };
    pub use crate::script::Script;
    pub use crate::search::SearchBuilder;
    pub use crate::serializer::Serializable;
    pub use crate::sort::{GeoPoint, Sort};
}
