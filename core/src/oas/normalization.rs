#![deny(missing_docs)]

//! # Document Normalization
//!
//! Brings raw schema files into the shape `SchemaDocument` expects before
//! deserializing. Only the document header is touched; schema nodes are
//! left exactly as written.

use serde_json::{json, Value};

/// Version stamped onto bare schema fragments.
pub(crate) const FRAGMENT_OPENAPI_VERSION: &str = "3.0.0";

/// Wraps a bare schema fragment (a mapping without an `openapi` marker)
/// with a minimal document header.
///
/// Returns `true` when the header was synthesised. Non-mapping values are
/// left untouched and fail later deserialization.
pub(crate) fn ensure_document_header(value: &mut Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if map.contains_key("openapi") {
        return false;
    }
    map.insert("openapi".to_string(), json!(FRAGMENT_OPENAPI_VERSION));
    if !map.contains_key("info") {
        map.insert(
            "info".to_string(),
            json!({ "title": "schema", "version": "0.0.0" }),
        );
    }
    true
}
