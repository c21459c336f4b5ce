//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the query builder, covering the two
//! validation tiers every builder node participates in: required-field
//! presence checks (evaluated when a node is serialized) and fixed-value
//! checks (evaluated immediately when a setter is called).
//!
//! ## Input/Output Specification
//! - **Input**: Validation failures from builder setters and serializers
//! - **Output**: Structured error variants with human-readable messages
//! - **Error Categories**: Missing fields/attributes, invalid enum values,
//!   script source conflicts, JSON encoding failures
//!
//! ## Key Features
//! - Message wording compatible with the historical DSL test corpus
//! - `Result` alias used throughout the crate
//! - Set-time vs serialize-time classification for diagnostics
//!
//! ## Usage
//! ```rust
//! use elastic_query_builder::errors::{BuilderError, Result};
//!
//! fn check(order: &str) -> Result<()> {
//!     match order {
//!         "asc" | "desc" => Ok(()),
//!         other => Err(BuilderError::InvalidValue {
//!             value: other.to_string(),
//!             attribute: "order",
//!         }),
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Validation and encoding errors raised while building or serializing
/// a query document
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required singular field was absent when the node was serialized
    #[error("The \"{0}\" is required!")]
    MissingRequiredField(&'static str),

    /// A required plural field (e.g. `values`) was absent when the node
    /// was serialized
    #[error("The \"{0}\" are required!")]
    MissingRequiredFields(&'static str),

    /// A required plural field was present but empty
    #[error("The \"{0}\" cannot be empty!")]
    EmptyValues(&'static str),

    /// A required type-level attribute was absent, e.g. an aggregation
    /// serialized without a name
    #[error("The {type_name} \"{attribute}\" is required!")]
    MissingRequiredAttribute {
        type_name: &'static str,
        attribute: &'static str,
    },

    /// A setter received a value outside its fixed valid set
    #[error("The [{value}] {attribute} is invalid!")]
    InvalidValue {
        value: String,
        attribute: &'static str,
    },

    /// One or more regexp flags were not recognized
    #[error("The given flags are invalid: {0}")]
    InvalidFlags(String),

    /// A script was serialized with neither an inline source nor a stored id
    #[error("The \"source\" or \"id\" is required!")]
    MissingScriptSource,

    /// A script was serialized with both an inline source and a stored id
    #[error("Passing both \"source\" and \"id\" at the same time is not allowed.")]
    ScriptSourceConflict,

    /// The cardinality precision threshold exceeded its supported maximum
    #[error("The maximum precision threshold supported value is 40000!")]
    PrecisionThresholdTooLarge,

    /// JSON text encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuilderError {
    /// Whether the error is raised eagerly by a setter, as opposed to
    /// being deferred until `serialize()`
    pub fn is_set_time(&self) -> bool {
        matches!(
            self,
            BuilderError::InvalidValue { .. }
                | BuilderError::InvalidFlags(_)
                | BuilderError::PrecisionThresholdTooLarge
        )
    }

    /// Error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BuilderError::MissingRequiredField(_)
            | BuilderError::MissingRequiredFields(_)
            | BuilderError::EmptyValues(_)
            | BuilderError::MissingRequiredAttribute { .. }
            | BuilderError::MissingScriptSource
            | BuilderError::ScriptSourceConflict => "validation",
            BuilderError::InvalidValue { .. }
            | BuilderError::InvalidFlags(_)
            | BuilderError::PrecisionThresholdTooLarge => "invalid_value",
            BuilderError::Json(_) => "encoding",
        }
    }
}
