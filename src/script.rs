//! # Script Module
//!
//! ## Purpose
//! Builder for inline and stored script references, reused by queries,
//! aggregations and script fields.
//!
//! ## Input/Output Specification
//! - **Input**: An inline source or a stored script id, plus language and
//!   parameters
//! - **Output**: A flat `{"source"|"id": ..., "lang"?: ..., "params"?: ...}`
//!   object
//! - **Validation**: Exactly one of `source` and `id` must be set; the two
//!   failure modes raise distinct errors

use serde_json::{Map, Value};

use crate::errors::{BuilderError, Result};
use crate::serializer::{Body, Serializable};

/// A script reference, either inline (`source`) or stored (`id`).
#[derive(Default)]
pub struct Script {
    body: Body,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// References a stored script by id.
    pub fn id(mut self, id: &str) -> Self {
        self.body.insert("id", id);
        self
    }

    /// Sets the inline script source.
    pub fn source(mut self, source: &str) -> Self {
        self.body.insert("source", source);
        self
    }

    /// Sets the scripting language, emitted under `lang`.
    pub fn language(mut self, language: &str) -> Self {
        self.body.insert("lang", language);
        self
    }

    /// Sets the named parameters passed to the script.
    pub fn parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.body.insert("params", Value::Object(parameters));
        self
    }
}

impl Serializable for Script {
    fn serialize(&self) -> Result<Value> {
        let has_source = self.body.contains("source");
        let has_id = self.body.contains("id");

        if !has_source && !has_id {
            return Err(BuilderError::MissingScriptSource);
        }

        if has_source && has_id {
            return Err(BuilderError::ScriptSourceConflict);
        }

        self.body.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_script() {
        let script = Script::new()
            .source("doc['grade'].value * 1.2")
            .language("painless");
        assert_eq!(
            script.serialize().unwrap(),
            json!({"source": "doc['grade'].value * 1.2", "lang": "painless"})
        );
    }

    #[test]
    fn test_stored_script_with_parameters() {
        let mut params = Map::new();
        params.insert("factor".to_string(), json!(1.2));

        let script = Script::new().id("calculate-score").parameters(params);
        assert_eq!(
            script.serialize().unwrap(),
            json!({"id": "calculate-score", "params": {"factor": 1.2}})
        );
    }

    #[test]
    fn test_script_requires_source_or_id() {
        let error = Script::new().serialize().unwrap_err();
        assert_eq!(error.to_string(), "The \"source\" or \"id\" is required!");
    }

    #[test]
    fn test_script_rejects_both_source_and_id() {
        let error = Script::new().source("1 + 1").id("stored").serialize().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Passing both \"source\" and \"id\" at the same time is not allowed."
        );
    }
}
