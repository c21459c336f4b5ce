//! # Query Module
//!
//! ## Purpose
//! Builder types for the `query` section of a search request body. Every
//! query serializes to a single-key fragment keyed by its DSL type tag
//! (`term`, `bool`, `range`, ...) and participates in the shared recursive
//! serialization contract.
//!
//! ## Input/Output Specification
//! - **Input**: Fluent setter chains describing one query clause
//! - **Output**: A `{"<tag>": {...}}` JSON fragment per query
//! - **Validation**: Required fields checked at serialization time, fixed
//!   value sets checked at set time
//!
//! ## Key Features
//! - Term-level, full-text, compound, joining and span query families
//! - Single-key collapse for field-oriented leaves
//! - Clause merging for the boolean compositor

pub mod compound;
pub mod full_text;
pub mod joining;
pub mod span;
pub mod term_level;

use serde_json::Value;

use crate::errors::{BuilderError, Result};
use crate::serializer::{tagged, Body, Serializable};

pub use compound::{BoolQuery, BoostingQuery, ConstantScoreQuery, DisMaxQuery};
pub use full_text::{MatchPhrasePrefixQuery, MatchPhraseQuery, MatchQuery};
pub use joining::NestedQuery;
pub use span::{SpanNearQuery, SpanOrQuery, SpanTermQuery};
pub use term_level::{
    ExistsQuery, FuzzyQuery, IdsQuery, PrefixQuery, RangeQuery, RegexpQuery, TermQuery,
    TermsQuery, TermsSetQuery, TypeQuery, WildcardQuery,
};

/// Marker trait for builder nodes that may appear in the `query` section
/// or inside compound query clauses.
pub trait Query: Serializable {}

/// Marker trait for queries accepted inside span compositor clauses.
pub trait SpanQuery: Query {}

/// Generates the option setters shared by every query type.
macro_rules! query_common {
    () => {
        /// Sets the boost factor for this query.
        pub fn boost(mut self, factor: f64) -> Self {
            self.body.insert("boost", factor);
            self
        }

        /// Names the query so matches report it under `matched_queries`.
        pub fn name(mut self, name: &str) -> Self {
            self.body.insert("_name", name);
            self
        }
    };
}

pub(crate) use query_common;

/// Serializes a field-oriented leaf query, applying the single-key collapse
/// rule: when the resolved body holds only the primary value key, the bare
/// value is emitted in place of the option object.
pub(crate) fn serialize_field_leaf(
    tag: &str,
    field: Option<&str>,
    body: &Body,
    primary: &'static str,
) -> Result<Value> {
    let field = field.ok_or(BuilderError::MissingRequiredField("field"))?;

    if !body.contains(primary) {
        return Err(BuilderError::MissingRequiredField(primary));
    }

    let mut resolved = body.to_map()?;

    let inner = if resolved.len() == 1 {
        resolved.remove(primary).unwrap_or(Value::Null)
    } else {
        Value::Object(resolved)
    };

    Ok(tagged(tag, tagged(field, inner)))
}

/// Matches all documents, optionally with a constant score.
#[derive(Default)]
pub struct MatchAllQuery {
    body: Body,
}

impl MatchAllQuery {
    pub fn new() -> Self {
        Self::default()
    }

    query_common!();
}

impl Serializable for MatchAllQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("match_all", self.body.to_value()?))
    }
}

impl Query for MatchAllQuery {}

/// The inverse of `match_all`: matches no documents.
#[derive(Default)]
pub struct MatchNoneQuery {
    body: Body,
}

impl MatchNoneQuery {
    pub fn new() -> Self {
        Self::default()
    }

    query_common!();
}

impl Serializable for MatchNoneQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("match_none", self.body.to_value()?))
    }
}

impl Query for MatchNoneQuery {}
