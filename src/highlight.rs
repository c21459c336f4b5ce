//! # Highlight Module
//!
//! ## Purpose
//! Builder for the `highlight` section of a search request body. Every
//! option can apply globally or be scoped to a single highlighted field.
//!
//! ## Input/Output Specification
//! - **Input**: Global options, field registrations and field-scoped options
//! - **Output**: `{<global options>, "fields"?: {"<field>": {<scoped options>}}}`
//! - **Scoping**: Setters taking `Option<&str>` write to the named field's
//!   option map when given, otherwise to the global map
//!
//! ## Key Features
//! - A field with no scoped options serializes as `{}`
//! - The `fields` key is omitted entirely when no fields were registered
//! - `fragment_offset` and `matched_fields` force the `fvh` highlighter
//! - Bare pre/post tag strings are wrapped into single-element arrays

use serde_json::{Map, Value};

use crate::errors::{BuilderError, Result};
use crate::query::Query;
use crate::serializer::{Body, Serializable};

const BOUNDARY_SCANNERS: [&str; 3] = ["chars", "sentence", "word"];
const ENCODERS: [&str; 2] = ["default", "html"];
const FRAGMENTERS: [&str; 2] = ["simple", "span"];
const TYPES: [&str; 3] = ["unified", "plain", "fvh"];

/// Builder for the highlighting section of a request.
#[derive(Debug, Default)]
pub struct Highlight {
    parameters: Body,
    fields: Vec<(String, Body)>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field for highlighting with no scoped options. A field
    /// keeps its first registration.
    pub fn field(mut self, field: &str) -> Self {
        self.register_field(field);
        self
    }

    /// Registers several fields for highlighting.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            self.register_field(field);
        }
        self
    }

    /// Registers a field using another builder's global options as the
    /// scoped options. The donor's own field registrations are ignored,
    /// and an already-registered field keeps its first registration.
    pub fn field_with(mut self, field: &str, highlight: Highlight) -> Self {
        if !self.fields.iter().any(|(existing, _)| existing == field) {
            self.fields.push((field.to_string(), highlight.parameters));
        }
        self
    }

    /// Characters the boundary scanner treats as boundaries.
    pub fn boundary_chars(mut self, chars: &str, field: Option<&str>) -> Self {
        self.set_parameter("boundary_chars", chars.into(), field);
        self
    }

    /// How far to scan for boundary characters.
    pub fn boundary_max_scan(mut self, max_scan: u64, field: Option<&str>) -> Self {
        self.set_parameter("boundary_max_scan", max_scan.into(), field);
        self
    }

    /// How to break highlighted fragments. Lowercased and validated
    /// eagerly against `chars` / `sentence` / `word`.
    pub fn boundary_scanner(mut self, scanner: &str, field: Option<&str>) -> Result<Self> {
        let scanner_lower = scanner.to_lowercase();

        if !BOUNDARY_SCANNERS.contains(&scanner_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: scanner.to_string(),
                attribute: "boundary scanner",
            });
        }

        self.set_parameter("boundary_scanner", scanner_lower.into(), field);
        Ok(self)
    }

    /// Locale used by the sentence and word boundary scanners.
    pub fn boundary_scanner_locale(mut self, locale: &str, field: Option<&str>) -> Self {
        self.set_parameter("boundary_scanner_locale", locale.into(), field);
        self
    }

    /// How snippet text is encoded in the response. Lowercased and
    /// validated eagerly against `default` / `html`.
    pub fn encoder(mut self, encoder: &str) -> Result<Self> {
        let encoder_lower = encoder.to_lowercase();

        if !ENCODERS.contains(&encoder_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: encoder.to_string(),
                attribute: "encoder",
            });
        }

        self.set_parameter("encoder", encoder_lower.into(), None);
        Ok(self)
    }

    /// Highlights from the original source even when fields are stored.
    pub fn force_source(mut self, status: bool, field: Option<&str>) -> Self {
        self.set_parameter("force_source", status.into(), field);
        self
    }

    /// How text is broken into fragments. Lowercased and validated eagerly
    /// against `simple` / `span`.
    pub fn fragmenter(mut self, fragmenter: &str, field: Option<&str>) -> Result<Self> {
        let fragmenter_lower = fragmenter.to_lowercase();

        if !FRAGMENTERS.contains(&fragmenter_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: fragmenter.to_string(),
                attribute: "fragmenter",
            });
        }

        self.set_parameter("fragmenter", fragmenter_lower.into(), field);
        Ok(self)
    }

    /// Margin from which highlighting starts; only supported by the `fvh`
    /// highlighter, which is selected implicitly.
    pub fn fragment_offset(mut self, offset: u64, field: Option<&str>) -> Self {
        self.set_parameter("type", "fvh".into(), field);
        self.set_parameter("fragment_offset", offset.into(), field);
        self
    }

    /// Size of the highlighted fragments, in characters.
    pub fn fragment_size(mut self, size: u64, field: Option<&str>) -> Self {
        self.set_parameter("fragment_size", size.into(), field);
        self
    }

    /// Highlights matches for a query other than the search query.
    pub fn highlight_query(mut self, query: impl Query + 'static, field: Option<&str>) -> Self {
        match field {
            Some(field) => self.scoped_body(field).insert_node("highlight_query", query),
            None => self.parameters.insert_node("highlight_query", query),
        }
        self
    }

    /// Combines matches from several fields into one highlighted result;
    /// only supported by the `fvh` highlighter, which is selected
    /// implicitly.
    pub fn matched_fields(mut self, fields: &[&str], field: &str) -> Self {
        let matched: Vec<Value> = fields.iter().map(|f| Value::String((*f).to_string())).collect();
        self.set_parameter("type", "fvh".into(), Some(field));
        self.set_parameter("matched_fields", Value::Array(matched), Some(field));
        self
    }

    /// Amount of leading text to return for fields with no match.
    pub fn no_match_size(mut self, size: u64, field: &str) -> Self {
        self.set_parameter("no_match_size", size.into(), Some(field));
        self
    }

    /// Maximum number of fragments to return.
    pub fn number_of_fragments(mut self, max_fragments: u64, field: Option<&str>) -> Self {
        self.set_parameter("number_of_fragments", max_fragments.into(), field);
        self
    }

    /// Sorts fragments by score instead of position.
    pub fn score_order(mut self, field: Option<&str>) -> Self {
        self.set_parameter("order", "score".into(), field);
        self
    }

    /// Maximum number of matching phrases considered by `fvh`.
    pub fn phrase_limit(mut self, limit: u64) -> Self {
        self.set_parameter("phrase_limit", limit.into(), None);
        self
    }

    /// Tags inserted before highlighted text; a bare string is wrapped
    /// into a single-element array.
    pub fn pre_tags(mut self, tags: impl Into<Value>, field: Option<&str>) -> Self {
        self.set_parameter("pre_tags", wrap_tags(tags.into()), field);
        self
    }

    /// Tags inserted after highlighted text; a bare string is wrapped
    /// into a single-element array.
    pub fn post_tags(mut self, tags: impl Into<Value>, field: Option<&str>) -> Self {
        self.set_parameter("post_tags", wrap_tags(tags.into()), field);
        self
    }

    /// Only highlights fields the query actually matched.
    pub fn require_field_match(mut self, status: bool, field: Option<&str>) -> Self {
        self.set_parameter("require_field_match", status.into(), field);
        self
    }

    /// Selects the built-in `styled` tag schema.
    pub fn tags_schema(mut self) -> Self {
        self.set_parameter("tags_schema", "styled".into(), None);
        self
    }

    /// Which highlighter implementation to use. Lowercased and validated
    /// eagerly against `unified` / `plain` / `fvh`.
    pub fn highlight_type(mut self, highlight_type: &str, field: Option<&str>) -> Result<Self> {
        let type_lower = highlight_type.to_lowercase();

        if !TYPES.contains(&type_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: highlight_type.to_string(),
                attribute: "type",
            });
        }

        self.set_parameter("type", type_lower.into(), field);
        Ok(self)
    }

    fn set_parameter(&mut self, parameter: &'static str, value: Value, field: Option<&str>) {
        match field {
            Some(field) => self.scoped_body(field).insert(parameter, value),
            None => self.parameters.insert(parameter, value),
        }
    }

    fn register_field(&mut self, field: &str) {
        if !self.fields.iter().any(|(existing, _)| existing == field) {
            self.fields.push((field.to_string(), Body::new()));
        }
    }

    fn scoped_body(&mut self, field: &str) -> &mut Body {
        if !self.fields.iter().any(|(existing, _)| existing == field) {
            self.fields.push((field.to_string(), Body::new()));
        }
        let index = self
            .fields
            .iter()
            .position(|(existing, _)| existing == field)
            .unwrap_or(0);
        &mut self.fields[index].1
    }
}

fn wrap_tags(tags: Value) -> Value {
    match tags {
        Value::Array(items) => Value::Array(items),
        other => Value::Array(vec![other]),
    }
}

impl Serializable for Highlight {
    fn serialize(&self) -> Result<Value> {
        let mut resolved = self.parameters.to_map()?;

        if !self.fields.is_empty() {
            let mut fields = Map::new();
            for (field, body) in &self.fields {
                fields.insert(field.clone(), body.to_value()?);
            }
            resolved.insert("fields".to_string(), Value::Object(fields));
        }

        Ok(Value::Object(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MatchQuery;
    use serde_json::json;

    #[test]
    fn test_empty_highlight_serializes_to_empty_object() {
        let highlight = Highlight::new();
        assert_eq!(highlight.serialize().unwrap(), json!({}));
    }

    #[test]
    fn test_field_without_options_serializes_to_empty_object() {
        let highlight = Highlight::new().field("content");
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {}}})
        );
    }

    #[test]
    fn test_fields_key_is_omitted_when_no_fields_registered() {
        let highlight = Highlight::new().fragment_size(150, None);
        assert_eq!(highlight.serialize().unwrap(), json!({"fragment_size": 150}));
    }

    #[test]
    fn test_global_versus_scoped_placement() {
        let highlight = Highlight::new()
            .fragment_size(150, None)
            .fragment_size(50, Some("content"));
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({
                "fragment_size": 150,
                "fields": {"content": {"fragment_size": 50}}
            })
        );
    }

    #[test]
    fn test_field_keeps_first_registration() {
        let highlight = Highlight::new()
            .fragment_size(50, Some("content"))
            .field("content");
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {"fragment_size": 50}}})
        );
    }

    #[test]
    fn test_field_with_merges_donor_global_options() {
        let donor = Highlight::new().fragment_size(50, None).field("ignored");
        let highlight = Highlight::new().field_with("content", donor);
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {"fragment_size": 50}}})
        );
    }

    #[test]
    fn test_fragment_offset_forces_fvh_type() {
        let highlight = Highlight::new().fragment_offset(10, Some("content"));
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {"type": "fvh", "fragment_offset": 10}}})
        );
    }

    #[test]
    fn test_matched_fields_forces_fvh_type() {
        let highlight = Highlight::new().matched_fields(&["content", "content.plain"], "content");
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {
                "type": "fvh",
                "matched_fields": ["content", "content.plain"]
            }}})
        );
    }

    #[test]
    fn test_bare_tag_strings_are_wrapped() {
        let highlight = Highlight::new()
            .pre_tags("<em>", None)
            .post_tags("</em>", None);
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"pre_tags": ["<em>"], "post_tags": ["</em>"]})
        );
    }

    #[test]
    fn test_tag_arrays_pass_through() {
        let highlight = Highlight::new().pre_tags(json!(["<em>", "<strong>"]), None);
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"pre_tags": ["<em>", "<strong>"]})
        );
    }

    #[test]
    fn test_score_order_and_tags_schema() {
        let highlight = Highlight::new().score_order(None).tags_schema();
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"order": "score", "tags_schema": "styled"})
        );
    }

    #[test]
    fn test_highlight_query_is_resolved_at_serialize_time() {
        let highlight = Highlight::new().highlight_query(
            MatchQuery::new().field("content").query("fox"),
            Some("content"),
        );
        assert_eq!(
            highlight.serialize().unwrap(),
            json!({"fields": {"content": {
                "highlight_query": {"match": {"content": "fox"}}
            }}})
        );
    }

    #[test]
    fn test_enum_validations() {
        assert_eq!(
            Highlight::new()
                .boundary_scanner("lines", None)
                .unwrap_err()
                .to_string(),
            "The [lines] boundary scanner is invalid!"
        );
        assert_eq!(
            Highlight::new().encoder("xml").unwrap_err().to_string(),
            "The [xml] encoder is invalid!"
        );
        assert_eq!(
            Highlight::new()
                .fragmenter("chunk", None)
                .unwrap_err()
                .to_string(),
            "The [chunk] fragmenter is invalid!"
        );
        assert_eq!(
            Highlight::new()
                .highlight_type("fast", None)
                .unwrap_err()
                .to_string(),
            "The [fast] type is invalid!"
        );
    }
}
