//! # Span Query Module
//!
//! ## Purpose
//! Builders for positional span queries: the `span_term` leaf and the
//! `span_near` / `span_or` compositors. Compositor clause slots only accept
//! types carrying the [`SpanQuery`] marker.

use serde_json::Value;

use crate::errors::Result;
use crate::query::{query_common, serialize_field_leaf, Query, SpanQuery};
use crate::serializer::{tagged, Body, Serializable};

/// Exact-term leaf for span compositors. Serializes with the same
/// single-key collapse rule as `term`.
#[derive(Default)]
pub struct SpanTermQuery {
    field: Option<String>,
    body: Body,
}

impl SpanTermQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the exact term to match.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    query_common!();
}

impl Serializable for SpanTermQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("span_term", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for SpanTermQuery {}
impl SpanQuery for SpanTermQuery {}

/// Matches spans that occur near each other, optionally in order.
#[derive(Default)]
pub struct SpanNearQuery {
    body: Body,
}

impl SpanNearQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a span clause; clauses always serialize as an array.
    pub fn query(mut self, query: impl SpanQuery + 'static) -> Self {
        self.body.push_node("clauses", query);
        self
    }

    /// Requires the clauses to match in the order they were added.
    pub fn in_order(mut self, status: bool) -> Self {
        self.body.insert("in_order", status);
        self
    }

    /// Maximum number of positions allowed between the matching spans.
    pub fn slop(mut self, slop: u64) -> Self {
        self.body.insert("slop", slop);
        self
    }

    query_common!();
}

impl Serializable for SpanNearQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("span_near", self.body.to_value()?))
    }
}

impl Query for SpanNearQuery {}
impl SpanQuery for SpanNearQuery {}

/// Matches the union of its span clauses.
#[derive(Default)]
pub struct SpanOrQuery {
    body: Body,
}

impl SpanOrQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a span clause; clauses always serialize as an array.
    pub fn query(mut self, query: impl SpanQuery + 'static) -> Self {
        self.body.push_node("clauses", query);
        self
    }

    query_common!();
}

impl Serializable for SpanOrQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("span_or", self.body.to_value()?))
    }
}

impl Query for SpanOrQuery {}
impl SpanQuery for SpanOrQuery {}
