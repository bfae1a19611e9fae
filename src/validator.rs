//! Structural validation of raw type-graph documents.
//!
//! Runs before deserialization so that every problem is reported at once,
//! each with a JSON Pointer into the document.

use std::sync::OnceLock;

use serde_json::Value;

use crate::error::{GraphError, LoadError};

/// JSON Schema describing the type-graph document.
pub const GRAPH_SCHEMA: &str = include_str!("graph.schema.json");

/// Compiled graph schema, built on first use. Holds the compile error message on failure.
static GRAPH_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn graph_validator() -> Result<&'static jsonschema::Validator, LoadError> {
    GRAPH_VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(GRAPH_SCHEMA).map_err(|e| e.to_string())?;
            jsonschema::validator_for(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|message| LoadError::InvalidGraph {
            errors: vec![GraphError {
                path: String::new(),
                message: format!("graph schema failed to compile: {}", message),
            }],
        })
}

/// Validate a raw type-graph document.
///
/// # Errors
///
/// Returns `LoadError::InvalidGraph` listing every violation found.
pub fn validate_graph(document: &Value) -> Result<(), LoadError> {
    let validator = graph_validator()?;

    let errors: Vec<GraphError> = validator
        .iter_errors(document)
        .map(|e| GraphError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(LoadError::InvalidGraph { errors })
    }
}
