//! # Term-Level Query Module
//!
//! ## Purpose
//! Builders for queries that match exact values: term, terms, terms_set,
//! exists, fuzzy, ids, prefix, range, regexp, wildcard and type.
//!
//! ## Input/Output Specification
//! - **Input**: Field names, literal values and per-query options
//! - **Output**: `{"<tag>": {"<field>": <value-or-options>}}` fragments
//! - **Validation**: `field` and the primary value key are required at
//!   serialization time; regexp flags and range relations are validated at
//!   set time

use serde_json::{Map, Value};

use crate::errors::{BuilderError, Result};
use crate::query::{query_common, serialize_field_leaf, Query};
use crate::script::Script;
use crate::serializer::{tagged, Body, Serializable};

/// Matches documents containing an exact term in the given field.
#[derive(Default)]
pub struct TermQuery {
    field: Option<String>,
    body: Body,
}

impl TermQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the value that needs to match exactly.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    query_common!();
}

impl Serializable for TermQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("term", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for TermQuery {}

/// Matches documents where the field value matches a wildcard pattern.
#[derive(Default)]
pub struct WildcardQuery {
    field: Option<String>,
    body: Body,
}

impl WildcardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the wildcard pattern, e.g. `jo*n`.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    query_common!();
}

impl Serializable for WildcardQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("wildcard", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for WildcardQuery {}

/// Matches documents containing terms with the given prefix.
#[derive(Default)]
pub struct PrefixQuery {
    field: Option<String>,
    body: Body,
}

impl PrefixQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the prefix to match.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    /// Method used to rewrite the query.
    pub fn rewrite(mut self, value: &str) -> Self {
        self.body.insert("rewrite", value);
        self
    }

    query_common!();
}

impl Serializable for PrefixQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("prefix", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for PrefixQuery {}

const VALID_REGEXP_FLAGS: [&str; 6] = [
    "ANYSTRING",
    "COMPLEMENT",
    "EMPTY",
    "INTERSECTION",
    "INTERVAL",
    "NONE",
];

/// Matches documents where the field value matches a regular expression.
#[derive(Debug, Default)]
pub struct RegexpQuery {
    field: Option<String>,
    body: Body,
}

impl RegexpQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the regular expression to match.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    /// Enables optional operators for the regular expression. Accepts a
    /// `|`-separated list; flags are uppercased and validated eagerly.
    pub fn flags(mut self, flags: &str) -> Result<Self> {
        let flags: Vec<String> = flags
            .split('|')
            .map(|flag| flag.to_uppercase())
            .collect();

        let invalid: Vec<&str> = flags
            .iter()
            .filter(|flag| !VALID_REGEXP_FLAGS.contains(&flag.as_str()))
            .map(String::as_str)
            .collect();

        if !invalid.is_empty() {
            return Err(BuilderError::InvalidFlags(invalid.join(", ")));
        }

        self.body.insert("flags", flags.join("|"));
        Ok(self)
    }

    /// Maximum number of automaton states required for the query.
    pub fn max_determinized_states(mut self, value: u64) -> Self {
        self.body.insert("max_determinized_states", value);
        self
    }

    /// Method used to rewrite the query.
    pub fn rewrite(mut self, value: &str) -> Self {
        self.body.insert("rewrite", value);
        self
    }

    query_common!();
}

impl Serializable for RegexpQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("regexp", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for RegexpQuery {}

/// Matches documents containing terms within the given edit distance.
#[derive(Default)]
pub struct FuzzyQuery {
    field: Option<String>,
    body: Body,
}

impl FuzzyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the value to search with.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("value", value);
        self
    }

    /// The maximum edit distance, either a number or `AUTO`.
    pub fn fuzziness(mut self, factor: impl Into<Value>) -> Self {
        self.body.insert("fuzziness", factor);
        self
    }

    /// The maximum number of terms that the fuzzy query will expand to.
    pub fn max_expansions(mut self, limit: u64) -> Self {
        self.body.insert("max_expansions", limit);
        self
    }

    /// The number of initial characters which will not be "fuzzified".
    pub fn prefix_length(mut self, length: u64) -> Self {
        self.body.insert("prefix_length", length);
        self
    }

    /// Whether fuzzy transpositions (ab -> ba) are supported.
    pub fn transpositions(mut self, status: bool) -> Self {
        self.body.insert("transpositions", status);
        self
    }

    query_common!();
}

impl Serializable for FuzzyQuery {
    fn serialize(&self) -> Result<Value> {
        serialize_field_leaf("fuzzy", self.field.as_deref(), &self.body, "value")
    }
}

impl Query for FuzzyQuery {}

/// Matches documents that contain any indexed value for a field.
#[derive(Default)]
pub struct ExistsQuery {
    body: Body,
}

impl ExistsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field that must exist.
    pub fn field(mut self, field: &str) -> Self {
        self.body.insert("field", field);
        self
    }

    query_common!();
}

impl Serializable for ExistsQuery {
    fn serialize(&self) -> Result<Value> {
        if !self.body.contains("field") {
            return Err(BuilderError::MissingRequiredField("field"));
        }

        Ok(tagged("exists", self.body.to_value()?))
    }
}

impl Query for ExistsQuery {}

/// Matches documents of the given mapping type.
#[derive(Default)]
pub struct TypeQuery {
    body: Body,
}

impl TypeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mapping type to match.
    pub fn value(mut self, mapping_type: &str) -> Self {
        self.body.insert("value", mapping_type);
        self
    }

    query_common!();
}

impl Serializable for TypeQuery {
    fn serialize(&self) -> Result<Value> {
        Ok(tagged("type", self.body.to_value()?))
    }
}

impl Query for TypeQuery {}

/// Matches documents by their `_id` values.
#[derive(Default)]
pub struct IdsQuery {
    body: Body,
}

impl IdsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the type of the documents to be returned.
    pub fn doc_type(mut self, doc_type: &str) -> Self {
        self.body.insert("type", doc_type);
        self
    }

    /// Sets the document ids to be returned.
    pub fn values(mut self, ids: Vec<&str>) -> Self {
        let ids: Vec<Value> = ids.into_iter().map(Value::from).collect();
        self.body.insert("values", ids);
        self
    }

    query_common!();
}

impl Serializable for IdsQuery {
    fn serialize(&self) -> Result<Value> {
        if !self.body.contains("values") {
            return Err(BuilderError::MissingRequiredFields("values"));
        }

        let resolved = self.body.to_map()?;
        let empty = match resolved.get("values") {
            // An empty list normalizes to an empty object before this check
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(entries)) => entries.is_empty(),
            _ => false,
        };
        if empty {
            return Err(BuilderError::EmptyValues("values"));
        }

        Ok(tagged("ids", Value::Object(resolved)))
    }
}

impl Query for IdsQuery {}

/// Matches documents containing any of the provided terms, either listed
/// inline or fetched from another document via a terms lookup.
#[derive(Default)]
pub struct TermsQuery {
    field: Option<String>,
    values: Vec<Value>,
    lookup: Map<String, Value>,
    body: Body,
}

impl TermsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to be searched against.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Adds a term that needs to match on the field value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Adds multiple terms that need to match on the field value.
    pub fn values(mut self, values: Vec<Value>) -> Self {
        self.values.extend(values);
        self
    }

    /// Sets the name of the index from which to fetch field values.
    pub fn index(mut self, index: &str) -> Self {
        self.lookup.insert("index".to_string(), index.into());
        self
    }

    /// Sets the id of the document from which to fetch field values.
    pub fn id(mut self, id: &str) -> Self {
        self.lookup.insert("id".to_string(), id.into());
        self
    }

    /// Sets the name of the field from which to fetch field values.
    pub fn path(mut self, path: &str) -> Self {
        self.lookup.insert("path".to_string(), path.into());
        self
    }

    /// Sets the custom routing value of the lookup document.
    pub fn routing(mut self, routing: &str) -> Self {
        self.lookup.insert("routing".to_string(), routing.into());
        self
    }

    query_common!();
}

impl Serializable for TermsQuery {
    fn serialize(&self) -> Result<Value> {
        let field = self
            .field
            .as_deref()
            .ok_or(BuilderError::MissingRequiredField("field"))?;

        if self.values.is_empty() && self.lookup.is_empty() {
            return Err(BuilderError::MissingRequiredFields("values"));
        }

        let values = if !self.lookup.is_empty() {
            Value::Object(self.lookup.clone())
        } else {
            // Duplicates are dropped, first occurrence wins
            let mut unique: Vec<Value> = Vec::with_capacity(self.values.len());
            for value in &self.values {
                if !unique.contains(value) {
                    unique.push(value.clone());
                }
            }
            Value::Array(unique)
        };

        let mut inner = Map::new();
        inner.insert(field.to_string(), values);
        for (key, value) in self.body.to_map()? {
            inner.insert(key, value);
        }

        Ok(tagged("terms", Value::Object(inner)))
    }
}

impl Query for TermsQuery {}

/// Matches documents containing a minimum number of exact terms, with the
/// minimum defined per document by a field or script.
#[derive(Default)]
pub struct TermsSetQuery {
    field: Option<String>,
    body: Body,
}

impl TermsSetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Adds a single term to match.
    pub fn term(mut self, term: &str) -> Self {
        self.body.push("terms", term);
        self
    }

    /// Replaces the terms to match.
    pub fn terms(mut self, terms: Vec<&str>) -> Self {
        let terms: Vec<Value> = terms.into_iter().map(Value::from).collect();
        self.body.insert("terms", terms);
        self
    }

    /// Numeric field holding the per-document number of required matches.
    pub fn minimum_should_match_field(mut self, field_name: &str) -> Self {
        self.body.insert("minimum_should_match_field", field_name);
        self
    }

    /// Script computing the per-document number of required matches.
    pub fn minimum_should_match_script(mut self, script: Script) -> Self {
        self.body.insert_node("minimum_should_match_script", script);
        self
    }

    query_common!();
}

impl Serializable for TermsSetQuery {
    fn serialize(&self) -> Result<Value> {
        let field = self
            .field
            .as_deref()
            .ok_or(BuilderError::MissingRequiredField("field"))?;

        Ok(tagged("terms_set", tagged(field, self.body.to_value()?)))
    }
}

impl Query for TermsSetQuery {}

const VALID_RANGE_RELATIONS: [&str; 4] = ["INTERSECTS", "CONTAINS", "DISJOINT", "WITHIN"];

/// Matches documents with field values inside the given range.
#[derive(Debug, Default)]
pub struct RangeQuery {
    field: Option<String>,
    body: Body,
}

impl RangeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to search on.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Sets the "greater than (gt)" range option.
    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("gt", value);
        self
    }

    /// Alias for [`RangeQuery::gt`].
    pub fn greater_than(self, value: impl Into<Value>) -> Self {
        self.gt(value)
    }

    /// Sets the "greater than or equals (gte)" range option.
    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("gte", value);
        self
    }

    /// Alias for [`RangeQuery::gte`].
    pub fn greater_than_equals(self, value: impl Into<Value>) -> Self {
        self.gte(value)
    }

    /// Sets the "less than (lt)" range option.
    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("lt", value);
        self
    }

    /// Alias for [`RangeQuery::lt`].
    pub fn less_than(self, value: impl Into<Value>) -> Self {
        self.lt(value)
    }

    /// Sets the "less than or equals (lte)" range option.
    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.body.insert("lte", value);
        self
    }

    /// Alias for [`RangeQuery::lte`].
    pub fn less_than_equals(self, value: impl Into<Value>) -> Self {
        self.lte(value)
    }

    /// Date format used to convert date values in the query.
    pub fn format(mut self, format: &str) -> Self {
        self.body.insert("format", format);
        self
    }

    /// How the query matches values for range fields. Uppercased and
    /// validated eagerly.
    pub fn relation(mut self, relation: &str) -> Result<Self> {
        let relation_upper = relation.to_uppercase();

        if !VALID_RANGE_RELATIONS.contains(&relation_upper.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: relation.to_string(),
                attribute: "relation",
            });
        }

        self.body.insert("relation", relation_upper);
        Ok(self)
    }

    /// Timezone used to convert date values in the query to UTC.
    pub fn time_zone(mut self, timezone: &str) -> Self {
        self.body.insert("time_zone", timezone);
        self
    }

    query_common!();
}

impl Serializable for RangeQuery {
    fn serialize(&self) -> Result<Value> {
        let field = self
            .field
            .as_deref()
            .ok_or(BuilderError::MissingRequiredField("field"))?;

        Ok(tagged("range", tagged(field, self.body.to_value()?)))
    }
}

impl Query for RangeQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_term_query_collapses_single_value() {
        let query = TermQuery::new().field("user").value("john");
        assert_eq!(query.serialize().unwrap(), json!({"term": {"user": "john"}}));
    }

    #[test]
    fn test_term_query_expands_with_second_key() {
        let query = TermQuery::new().field("user").value("john").boost(1.5);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"term": {"user": {"value": "john", "boost": 1.5}}})
        );
    }

    #[test]
    fn test_term_query_with_name() {
        let query = TermQuery::new()
            .field("user")
            .value("john")
            .name("my-query-name");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"term": {"user": {"value": "john", "_name": "my-query-name"}}})
        );
    }

    #[test]
    fn test_term_query_requires_field() {
        let error = TermQuery::new().serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"field\" is required!");
    }

    #[test]
    fn test_term_query_requires_value() {
        let error = TermQuery::new().field("user").serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"value\" is required!");
    }

    #[test]
    fn test_wildcard_query() {
        let query = WildcardQuery::new().field("user").value("jo*n");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"wildcard": {"user": "jo*n"}})
        );
    }

    #[test]
    fn test_prefix_query_with_rewrite() {
        let query = PrefixQuery::new()
            .field("user")
            .value("jo")
            .rewrite("constant_score");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"prefix": {"user": {"value": "jo", "rewrite": "constant_score"}}})
        );
    }

    #[test]
    fn test_regexp_query_flags_are_uppercased_and_joined() {
        let query = RegexpQuery::new()
            .field("user")
            .value("jo.*n")
            .flags("anystring|intersection")
            .unwrap();
        assert_eq!(
            query.serialize().unwrap(),
            json!({"regexp": {"user": {"value": "jo.*n", "flags": "ANYSTRING|INTERSECTION"}}})
        );
    }

    #[test]
    fn test_regexp_query_rejects_invalid_flags_at_set_time() {
        let error = RegexpQuery::new().flags("anystring|bogus").unwrap_err();
        assert_eq!(error.to_string(), "The given flags are invalid: BOGUS");
    }

    #[test]
    fn test_fuzzy_query_options() {
        let query = FuzzyQuery::new()
            .field("user")
            .value("john")
            .fuzziness(2)
            .transpositions(true);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"fuzzy": {"user": {"value": "john", "fuzziness": 2, "transpositions": true}}})
        );
    }

    #[test]
    fn test_exists_query() {
        let query = ExistsQuery::new().field("user");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"exists": {"field": "user"}})
        );
    }

    #[test]
    fn test_exists_query_requires_field() {
        let error = ExistsQuery::new().serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"field\" is required!");
    }

    #[test]
    fn test_type_query() {
        let query = TypeQuery::new().value("doc");
        assert_eq!(query.serialize().unwrap(), json!({"type": {"value": "doc"}}));
    }

    #[test]
    fn test_ids_query() {
        let query = IdsQuery::new().values(vec!["1", "4", "100"]);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"ids": {"values": ["1", "4", "100"]}})
        );
    }

    #[test]
    fn test_ids_query_requires_values() {
        let error = IdsQuery::new().serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"values\" are required!");
    }

    #[test]
    fn test_ids_query_rejects_empty_values() {
        let error = IdsQuery::new().values(vec![]).serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"values\" cannot be empty!");
    }

    #[test]
    fn test_terms_query_dedups_preserving_order() {
        let query = TermsQuery::new()
            .field("user")
            .value("john")
            .value("jane")
            .value("john");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"terms": {"user": ["john", "jane"]}})
        );
    }

    #[test]
    fn test_terms_query_lookup_wins_over_values() {
        let query = TermsQuery::new()
            .field("user")
            .index("users")
            .id("2")
            .path("followers");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"terms": {"user": {"index": "users", "id": "2", "path": "followers"}}})
        );
    }

    #[test]
    fn test_terms_query_requires_values_or_lookup() {
        let error = TermsQuery::new().field("user").serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"values\" are required!");
    }

    #[test]
    fn test_terms_set_query() {
        let query = TermsSetQuery::new()
            .field("programming_languages")
            .terms(vec!["rust", "go"])
            .minimum_should_match_field("required_matches");
        assert_eq!(
            query.serialize().unwrap(),
            json!({"terms_set": {"programming_languages": {
                "terms": ["rust", "go"],
                "minimum_should_match_field": "required_matches"
            }}})
        );
    }

    #[test]
    fn test_range_query_greater_than() {
        let query = RangeQuery::new().field("user").greater_than(12);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"range": {"user": {"gt": 12}}})
        );
    }

    #[test]
    fn test_range_query_full_bounds() {
        let query = RangeQuery::new().field("age").gte(10).lte(20);
        assert_eq!(
            query.serialize().unwrap(),
            json!({"range": {"age": {"gte": 10, "lte": 20}}})
        );
    }

    #[test]
    fn test_range_query_relation_is_uppercased() {
        let query = RangeQuery::new()
            .field("date_range")
            .gte("2020-01-01")
            .relation("within")
            .unwrap();
        assert_eq!(
            query.serialize().unwrap(),
            json!({"range": {"date_range": {"gte": "2020-01-01", "relation": "WITHIN"}}})
        );
    }

    #[test]
    fn test_range_query_rejects_invalid_relation_at_set_time() {
        let error = RangeQuery::new().relation("overlaps").unwrap_err();
        assert_eq!(error.to_string(), "The [overlaps] relation is invalid!");
    }

    #[test]
    fn test_range_query_requires_field() {
        let error = RangeQuery::new().gt(10).serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"field\" is required!");
    }
}
