//! Type-graph loading from files, strings, and HTTP URLs.
//!
//! The graph is produced by the external source loader. Every document is
//! checked against the graph schema before it is deserialized.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{GraphError, LoadError};
use crate::graph::TypeGraph;
use crate::validator::validate_graph;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a type graph from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if the file isn't valid JSON, or
/// `LoadError::InvalidGraph` if it isn't a well-formed type graph.
pub fn load_graph(path: &Path) -> Result<TypeGraph, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loading type graph");
    load_graph_str(&content)
}

/// Load a type graph from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON, or
/// `LoadError::InvalidGraph` if it isn't a well-formed type graph.
pub fn load_graph_str(content: &str) -> Result<TypeGraph, LoadError> {
    let document: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    graph_from_value(document)
}

/// Turn an already parsed JSON document into a type graph.
///
/// # Errors
///
/// Returns `LoadError::InvalidGraph` if the document isn't a well-formed type graph.
pub fn graph_from_value(document: Value) -> Result<TypeGraph, LoadError> {
    validate_graph(&document)?;
    // Well-formed JSON that still does not fit the graph model is a graph error.
    serde_json::from_value(document).map_err(|source| LoadError::InvalidGraph {
        errors: vec![GraphError {
            path: String::new(),
            message: source.to_string(),
        }],
    })
}

/// Load a type graph from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or the
/// validation errors of [`graph_from_value`].
#[cfg(feature = "remote")]
pub fn load_graph_url(url: &str) -> Result<TypeGraph, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    // Check for HTTP errors before parsing
    let response = response
        .error_for_status()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let document: Value = response.json().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })?;

    debug!(url, "loaded type graph");
    graph_from_value(document)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a type graph from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_graph_auto(source: &str) -> Result<TypeGraph, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_graph_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_graph(Path::new(source))
    }
}
