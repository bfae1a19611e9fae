//! Component Schema Generator
//!
//! Translates annotated struct declarations of a host package into a
//! component package schema of resources and complex types.
//!
//! The host package arrives as a [`TypeGraph`]: the semantic view of its
//! package-scope declarations as produced by an external source loader.
//!
//! # Example
//!
//! ```
//! use component_schema::{generate, load_graph_str, GenerateOptions};
//!
//! let graph = load_graph_str(r#"{
//!     "path": "example.com/shapes",
//!     "objects": [{
//!         "name": "Point",
//!         "kind": "type",
//!         "type": {
//!             "kind": "named",
//!             "name": "Point",
//!             "package": "example.com/shapes",
//!             "underlying": {
//!                 "kind": "struct",
//!                 "fields": [
//!                     { "name": "X", "type": { "kind": "basic", "name": "float64" }, "tag": "pulumi:\"x\"" },
//!                     { "name": "Y", "type": { "kind": "basic", "name": "float64" }, "tag": "pulumi:\"y\"" }
//!                 ]
//!             }
//!         }
//!     }],
//!     "files": [{
//!         "path": "point.go",
//!         "declarations": [{ "name": "Point", "position": { "file": "point.go", "line": 3, "column": 6 } }]
//!     }]
//! }"#).unwrap();
//!
//! let schema = generate(&graph, &GenerateOptions::new("shapes")).unwrap();
//! let point = &schema.types["shapes:index:Point"];
//! assert!(point.object.properties.contains_key("x"));
//! assert!(schema.resources.is_empty());
//! ```
//!
//! # Annotations
//!
//! | Token | Meaning |
//! |-------|---------|
//! | first | Property name (required) |
//! | `optional` | Property may be absent; field must be a pointer |
//! | `replaces` | Changing it replaces the resource; resources only |
//! | `in` | Input-only property |
//! | `out` | Output property; resources only |
//! | `ref=<name>` | Reference this type token instead of the computed one |
//!
//! Unknown tokens are ignored.

mod classify;
mod error;
mod generate;
mod graph;
mod loader;
mod mapper;
mod options;
mod types;
mod validator;

pub use classify::{
    package_matches, Classifier, Marker, MarkerTable, SpecialKind, DEFAULT_MARKER_PACKAGE,
};
pub use error::{GenerateError, GraphError, LoadError, MapError, TagViolation};
pub use generate::{generate, GenerateOptions, Generator, Registry};
pub use graph::{
    BasicKind, DeclarationNode, Field, HostType, NamedType, ObjectKind, PackageObject, Position,
    SourceFile, TypeGraph,
};
pub use loader::{graph_from_value, is_url, load_graph, load_graph_auto, load_graph_str};
pub use mapper::TypeMapper;
pub use options::{lookup_tag, parse_property_options, PropertyOptions, DEFAULT_TAG_KEY};
pub use types::{
    qualified_name, ComplexTypeSpec, ObjectTypeSpec, PackageSchema, PropertySpec, ResourceSpec,
    ScalarType, TypeDescriptor, ANY_TYPE_TOKEN,
};
pub use validator::{validate_graph, GRAPH_SCHEMA};

#[cfg(feature = "remote")]
pub use loader::load_graph_url;
