//! # Compound Query Module
//!
//! ## Purpose
//! Builders for queries that wrap other queries: the boolean clause
//! compositor plus boosting, constant_score and dis_max.
//!
//! ## Input/Output Specification
//! - **Input**: Child query nodes attached under named clauses or slots
//! - **Output**: `{"<tag>": {...}}` fragments with clause-specific merge
//!   rules applied
//! - **Clause Merge**: A boolean clause with one child emits the child's
//!   fragment directly; with several children it emits an array in
//!   insertion order

use serde_json::{Map, Value};

use crate::errors::Result;
use crate::query::{query_common, Query};
use crate::serializer::{tagged, Body, Serializable};

/// Combines child queries under `must`, `filter`, `must_not` and `should`
/// clauses.
#[derive(Default)]
pub struct BoolQuery {
    clauses: Vec<(&'static str, Vec<Box<dyn Query>>)>,
    body: Body,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query that must match and contributes to the score.
    pub fn must(mut self, query: impl Query + 'static) -> Self {
        self.add_clause("must", Box::new(query));
        self
    }

    /// Adds a query that must match without affecting the score.
    pub fn filter(mut self, query: impl Query + 'static) -> Self {
        self.add_clause("filter", Box::new(query));
        self
    }

    /// Adds a query that must not match.
    pub fn must_not(mut self, query: impl Query + 'static) -> Self {
        self.add_clause("must_not", Box::new(query));
        self
    }

    /// Adds a query that should match.
    pub fn should(mut self, query: impl Query + 'static) -> Self {
        self.add_clause("should", Box::new(query));
        self
    }

    /// Number or percentage of `should` clauses a document must match.
    pub fn minimum_should_match(mut self, minimum: impl Into<Value>) -> Self {
        self.body.insert("minimum_should_match", minimum);
        self
    }

    query_common!();

    fn add_clause(&mut self, clause: &'static str, query: Box<dyn Query>) {
        match self
            .clauses
            .iter_mut()
            .find(|(existing, _)| *existing == clause)
        {
            Some((_, queries)) => queries.push(query),
            None => self.clauses.push((clause, vec![query])),
        }
    }
}

impl Serializable for BoolQuery {
    fn serialize(&self) -> Result<Value> {
        let mut inner = Map::new();

        // A single clause entry collapses to its bare fragment, several
        // entries stay an array in insertion order
        for (clause, queries) in &self.clauses {
            let fragment = if queries.len() == 1 {
                queries[0].serialize()?
            } else {
                let mut items = Vec::with_capacity(queries.len());
                for query in queries {
                    items.push(query.serialize()?);
                }
                Value::Array(items)
            };
            inner.insert((*clause).to_string(), fragment);
        }

        for (key, value) in self.body.to_map()? {
            inner.insert(key, value);
        }

        Ok(tagged("bool", Value::Object(inner)))
    }
}

impl Query for BoolQuery {}

/// Demotes documents matching the negative query without excluding them.
#[derive(Default)]
pub struct BoostingQuery {
    body: Body,
}

impl BoostingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query that desired documents must match.
    pub fn positive(mut self, query: impl Query + 'static) -> Self {
        self.body.insert_node("positive", query);
        self
    }

    /// Query whose matches have their score reduced.
    pub fn negative(mut self, query: impl Query + 'static) -> Self {
        self.body.insert_node("negative", query);
        self
    }

    /// Factor between 0 and 1 applied to the score of negative matches.
    pub fn negative_boost(mut self, factor: f64) -> Self {
        self.body.insert("negative_boost", factor);
        self
    }

    query_common!();
}

impl Serializable for BoostingQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("boosting", self.body.to_value()?))
    }
}

impl Query for BoostingQuery {}

/// Wraps a filter query and gives every match a constant score.
#[derive(Default)]
pub struct ConstantScoreQuery {
    body: Body,
}

impl ConstantScoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter query to wrap.
    pub fn filter(mut self, query: impl Query + 'static) -> Self {
        self.body.insert_node("filter", query);
        self
    }

    query_common!();
}

impl Serializable for ConstantScoreQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("constant_score", self.body.to_value()?))
    }
}

impl Query for ConstantScoreQuery {}

/// Scores documents by the best-matching child query.
#[derive(Default)]
pub struct DisMaxQuery {
    body: Body,
}

impl DisMaxQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child query; the list always serializes as an array.
    pub fn query(mut self, query: impl Query + 'static) -> Self {
        self.body.push_node("queries", query);
        self
    }

    /// Score bonus factor for documents matching several child queries.
    pub fn tie_breaker(mut self, factor: f64) -> Self {
        self.body.insert("tie_breaker", factor);
        self
    }

    query_common!();
}

impl Serializable for DisMaxQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("dis_max", self.body.to_value()?))
    }
}

impl Query for DisMaxQuery {}
