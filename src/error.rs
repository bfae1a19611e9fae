//! Error types for type-graph loading and schema generation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::graph::Position;

/// Errors while loading a type graph.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid type graph: {}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidGraph { errors: Vec<GraphError> },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Single structural problem in a type-graph document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphError {
    /// JSON Pointer (RFC 6901) to the offending value.
    pub path: String,
    pub message: String,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A host type that has no schema counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map index type {key} must be a string (or string-backed type)")]
    NonStringMapKey { key: String },

    #[error("bad primitive type {kind}; must be bool, int, float, or string")]
    UnsupportedPrimitive { kind: String },

    #[error("unrecognized field type {ty}")]
    UnrecognizedFieldType { ty: String },
}

/// Misuse of an annotation on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagViolation {
    MissingName,
    OutOnNonResource,
    ReplacesOnNonResource,
    OptionalOnNonPointer,
}

impl fmt::Display for TagViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagViolation::MissingName => "is missing a property name in its annotation",
            TagViolation::OutOnNonResource => "is marked `out` but is not a resource property",
            TagViolation::ReplacesOnNonResource => {
                "is marked `replaces` but is not a resource property"
            }
            TagViolation::OptionalOnNonPointer => {
                "is marked `optional` but is not a pointer in the schema"
            }
        })
    }
}

/// Errors during schema generation. The first one aborts the run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("missing declaration for {name}")]
    DeclarationNotFound { name: String },

    #[error("{position}: {name} is an illegal top-level {kind} type; only structs are supported")]
    IllegalTopLevelKind {
        position: Position,
        name: String,
        kind: &'static str,
    },

    #[error("{position}: field {declaration}.{field} {violation}")]
    Tag {
        position: Position,
        declaration: String,
        field: String,
        violation: TagViolation,
    },

    #[error("{position}: field {declaration}.{field} is not a legal schema type: {source}")]
    TypeMapping {
        position: Position,
        declaration: String,
        field: String,
        #[source]
        source: MapError,
    },
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> Position {
        Position {
            file: "widget.go".into(),
            line: 7,
            column: 2,
        }
    }

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("graph.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidGraph { errors: vec![] };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_graph_display_joins_errors() {
        let err = LoadError::InvalidGraph {
            errors: vec![
                GraphError {
                    path: "/objects/0".into(),
                    message: "\"name\" is a required property".into(),
                },
                GraphError {
                    path: "".into(),
                    message: "\"path\" is a required property".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid type graph: /objects/0: \"name\" is a required property; \"path\" is a required property"
        );
    }

    #[test]
    fn tag_error_display() {
        let err = GenerateError::Tag {
            position: position(),
            declaration: "Point".into(),
            field: "X".into(),
            violation: TagViolation::OutOnNonResource,
        };
        assert_eq!(
            err.to_string(),
            "widget.go:7,2: field Point.X is marked `out` but is not a resource property"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn type_mapping_error_display() {
        let err = GenerateError::TypeMapping {
            position: position(),
            declaration: "Widget".into(),
            field: "Counts".into(),
            source: MapError::NonStringMapKey { key: "int".into() },
        };
        assert_eq!(
            err.to_string(),
            "widget.go:7,2: field Widget.Counts is not a legal schema type: map index type int must be a string (or string-backed type)"
        );
    }
}
