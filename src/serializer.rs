//! # Serialization Core Module
//!
//! ## Purpose
//! Implements the recursive serialization contract shared by every builder
//! node: queries, aggregations, sorts, scripts and highlights all resolve to
//! a single canonical `serde_json::Value` tree through the machinery in this
//! module.
//!
//! ## Input/Output Specification
//! - **Input**: Builder nodes holding ordered bodies of scalars, child nodes
//!   and nested collections
//! - **Output**: Normalized JSON values and (optionally pretty-printed) JSON
//!   text
//! - **Normalization**: Empty sequences become empty objects at every depth
//!
//! ## Key Features
//! - `Serializable` trait implemented by every builder node
//! - `Body`, an insertion-ordered container mixing plain JSON values with
//!   live child nodes resolved lazily at serialization time
//! - Depth-first child resolution (children before parents)
//! - Pure, non-mutating resolution: the same node serializes to the same
//!   value every time until it is mutated
//! - 4-space pretty printer matching the historical JSON fixtures

use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::errors::Result;

/// Contract implemented by every builder node.
///
/// `serialize` validates the node's required fields, resolves every child
/// node depth-first and returns the node's fragment of the final document.
/// It never mutates the node, so repeated calls yield structurally equal
/// results.
pub trait Serializable {
    /// Produces the canonical nested-map fragment for this node.
    fn serialize(&self) -> Result<Value>;

    /// Serializes the node and encodes it as JSON text. `pretty` selects
    /// 4-space indented output and changes nothing else.
    fn serialize_to_text(&self, pretty: bool) -> Result<String> {
        to_text(&self.serialize()?, pretty)
    }
}

/// Encodes an already-serialized value as JSON text.
pub fn to_text(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut out, formatter);
        serde::Serialize::serialize(value, &mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

/// Wraps a fragment under a single type-tag key, e.g. `{"term": {...}}`.
pub fn tagged(tag: &str, value: Value) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(tag.to_string(), value);
    Value::Object(wrapper)
}

/// Replaces empty arrays with empty objects, recursively.
///
/// The consuming schema treats "no keys set" as an empty object; a bare `[]`
/// anywhere in the document is rejected by its validator.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.is_empty() => Value::Object(Map::new()),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), normalize(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// One entry in a builder node's body: either a plain JSON value or one of
/// the child-node shapes that resolve lazily when the owner is serialized.
pub enum BodyValue {
    /// A scalar, array or map of plain JSON values
    Plain(Value),
    /// A single child node
    Node(Box<dyn Serializable>),
    /// An ordered list of child nodes, emitted as an array
    Nodes(Vec<Box<dyn Serializable>>),
    /// An ordered name-to-node map, emitted as an object; a later entry
    /// with the same name overwrites the earlier one
    NamedNodes(Vec<(String, Box<dyn Serializable>)>),
}

impl std::fmt::Debug for BodyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyValue::Plain(value) => f.debug_tuple("Plain").field(value).finish(),
            BodyValue::Node(_) => f.write_str("Node(..)"),
            BodyValue::Nodes(nodes) => write!(f, "Nodes(len={})", nodes.len()),
            BodyValue::NamedNodes(entries) => {
                let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
                f.debug_tuple("NamedNodes").field(&names).finish()
            }
        }
    }
}

impl BodyValue {
    fn resolve(&self) -> Result<Value> {
        match self {
            BodyValue::Plain(value) => Ok(normalize(value)),
            BodyValue::Node(node) => node.serialize(),
            BodyValue::Nodes(nodes) => {
                if nodes.is_empty() {
                    return Ok(Value::Object(Map::new()));
                }
                let mut items = Vec::with_capacity(nodes.len());
                for node in nodes {
                    items.push(node.serialize()?);
                }
                Ok(Value::Array(items))
            }
            BodyValue::NamedNodes(entries) => {
                let mut resolved = Map::new();
                for (name, node) in entries {
                    resolved.insert(name.clone(), node.serialize()?);
                }
                Ok(Value::Object(resolved))
            }
        }
    }
}

/// Insertion-ordered body of a builder node.
///
/// Setters overwrite in place (the key keeps its original position), matching
/// the idempotent-overwrite lifecycle of the builders. Pluralized setters use
/// the `push*` methods, which append instead.
#[derive(Debug, Default)]
pub struct Body {
    entries: Vec<(&'static str, BodyValue)>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == key)
    }

    /// Stores a plain value under `key`, overwriting any previous entry.
    pub fn insert(&mut self, key: &'static str, value: impl Into<Value>) {
        self.set(key, BodyValue::Plain(value.into()));
    }

    /// Stores a child node under `key`, overwriting any previous entry.
    pub fn insert_node(&mut self, key: &'static str, node: impl Serializable + 'static) {
        self.set(key, BodyValue::Node(Box::new(node)));
    }

    /// Appends a plain value to the array under `key`, creating it on first
    /// use.
    pub fn push(&mut self, key: &'static str, value: impl Into<Value>) {
        match self.entry(key) {
            Some(BodyValue::Plain(Value::Array(items))) => items.push(value.into()),
            Some(slot) => *slot = BodyValue::Plain(Value::Array(vec![value.into()])),
            None => {
                self.entries
                    .push((key, BodyValue::Plain(Value::Array(vec![value.into()]))));
            }
        }
    }

    /// Appends a child node to the node list under `key`, creating it on
    /// first use.
    pub fn push_node(&mut self, key: &'static str, node: impl Serializable + 'static) {
        match self.entry(key) {
            Some(BodyValue::Nodes(nodes)) => nodes.push(Box::new(node)),
            Some(slot) => *slot = BodyValue::Nodes(vec![Box::new(node)]),
            None => {
                self.entries
                    .push((key, BodyValue::Nodes(vec![Box::new(node)])));
            }
        }
    }

    /// Stores a child node under `key` in a named sub-map, e.g. the
    /// `script_fields` section. A repeated name overwrites the earlier node
    /// while keeping its position.
    pub fn insert_named_node(
        &mut self,
        key: &'static str,
        name: &str,
        node: impl Serializable + 'static,
    ) {
        match self.entry(key) {
            Some(BodyValue::NamedNodes(entries)) => {
                if let Some(entry) = entries.iter_mut().find(|(existing, _)| existing == name) {
                    entry.1 = Box::new(node);
                } else {
                    entries.push((name.to_string(), Box::new(node)));
                }
            }
            Some(slot) => *slot = BodyValue::NamedNodes(vec![(name.to_string(), Box::new(node))]),
            None => {
                self.entries.push((
                    key,
                    BodyValue::NamedNodes(vec![(name.to_string(), Box::new(node))]),
                ));
            }
        }
    }

    /// Resolves the body into a plain JSON map, recursively serializing
    /// child nodes and normalizing empty sequences.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        let mut resolved = Map::new();
        for (key, value) in &self.entries {
            resolved.insert((*key).to_string(), value.resolve()?);
        }
        Ok(resolved)
    }

    /// Resolves the body into a JSON object value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(Value::Object(self.to_map()?))
    }

    fn entry(&mut self, key: &'static str) -> Option<&mut BodyValue> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    fn set(&mut self, key: &'static str, value: BodyValue) {
        match self.entry(key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Stub(Value);

    impl Serializable for Stub {
        fn serialize(&self) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_normalize_replaces_empty_arrays_at_depth() {
        let value = json!({"a": [], "b": {"c": []}, "d": [1, []]});
        assert_eq!(
            normalize(&value),
            json!({"a": {}, "b": {"c": {}}, "d": [1, {}]})
        );
    }

    #[test]
    fn test_normalize_passes_scalars_through() {
        assert_eq!(normalize(&json!("text")), json!("text"));
        assert_eq!(normalize(&json!(42)), json!(42));
        assert_eq!(normalize(&json!(null)), json!(null));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut body = Body::new();
        body.insert("a", 1);
        body.insert("b", 2);
        body.insert("a", 3);

        let map = body.to_map().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map["a"], json!(3));
    }

    #[test]
    fn test_push_accumulates() {
        let mut body = Body::new();
        body.push("sort", "a");
        body.push("sort", "b");
        assert_eq!(body.to_value().unwrap(), json!({"sort": ["a", "b"]}));
    }

    #[test]
    fn test_child_nodes_resolve_depth_first() {
        let mut body = Body::new();
        body.insert_node("query", Stub(json!({"match_all": {}})));
        assert_eq!(
            body.to_value().unwrap(),
            json!({"query": {"match_all": {}}})
        );
    }

    #[test]
    fn test_named_nodes_overwrite_by_name() {
        let mut body = Body::new();
        body.insert_named_node("script_fields", "a", Stub(json!(1)));
        body.insert_named_node("script_fields", "b", Stub(json!(2)));
        body.insert_named_node("script_fields", "a", Stub(json!(3)));
        assert_eq!(
            body.to_value().unwrap(),
            json!({"script_fields": {"a": 3, "b": 2}})
        );
    }

    #[test]
    fn test_resolution_is_idempotent_and_pure() {
        let mut body = Body::new();
        body.insert("options", json!([]));
        body.insert_node("inner", Stub(json!({"x": []})));

        let first = body.to_value().unwrap();
        let second = body.to_value().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, json!({"options": {}, "inner": {"x": []}}));
    }

    #[test]
    fn test_pretty_text_uses_four_space_indent() {
        let value = json!({"term": {"user": "john"}});
        let text = to_text(&value, true).unwrap();
        assert_eq!(text, "{\n    \"term\": {\n        \"user\": \"john\"\n    }\n}");
    }

    #[test]
    fn test_compact_text() {
        let value = json!({"from": 0, "size": 10});
        assert_eq!(to_text(&value, false).unwrap(), "{\"from\":0,\"size\":10}");
    }
}
