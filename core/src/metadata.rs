#![deny(missing_docs)]

//! # Metadata Projection
//!
//! Extracts documentation text and default-value literals from schema nodes
//! and manifest overrides.
//!
//! Literals are rendered ready for the templates: strings are quoted with
//! JSON escaping, numbers and booleans pass through. Composite defaults
//! (lists, mappings) cannot be written as one literal and are dropped.

use crate::oas::models::{scalar_text, RefOr, SchemaNode};
use crate::oas::registry::SchemaIndex;
use crate::type_mapping::TypeRef;
use serde_json::Value;

/// Collapses runs of whitespace (including newlines) to single spaces.
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_description(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Normalized description of a node.
pub fn node_description(node: &SchemaNode) -> Option<String> {
    node.description.as_deref().and_then(normalize_description)
}

/// Normalized description of a property schema.
///
/// A reference takes the target's description; an inline single-parent
/// composition without its own text falls back to its parent's.
pub fn schema_description(index: &SchemaIndex, schema: &RefOr<SchemaNode>) -> Option<String> {
    match schema {
        RefOr::Ref(r) => index.resolve(r).and_then(node_description),
        RefOr::T(node) => node_description(node).or_else(|| {
            node.single_all_of_ref()
                .and_then(|r| index.resolve(r))
                .and_then(node_description)
        }),
    }
}

/// Quotes `text` as a string literal.
pub fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// Renders a scalar as a literal of type `base`.
///
/// A `string` base always quotes; otherwise only values that are strings in
/// the document are quoted.
pub fn scalar_literal(base: &TypeRef, value: &Value) -> String {
    match (base, value) {
        (TypeRef::String, v) => quote(&scalar_text(v)),
        (_, Value::String(s)) => quote(s),
        (_, v) => scalar_text(v),
    }
}

/// The default literal declared on a node, if it is a scalar.
pub fn default_literal(node: &SchemaNode) -> Option<String> {
    let value = node.default.as_ref()?;
    if !is_scalar(value) {
        return None;
    }
    Some(scalar_literal(&TypeRef::enum_base(node.schema_type), value))
}

/// The default literal of a property schema, following references.
pub fn schema_default(index: &SchemaIndex, schema: &RefOr<SchemaNode>) -> Option<String> {
    index.resolve_ref_or(schema).and_then(default_literal)
}

/// The default literal of a manifest override, rendered for the override's
/// declared type text (a leading `*` is ignored).
pub fn override_default_literal(type_text: &str, value: Option<&Value>) -> Option<String> {
    let value = value?;
    if !is_scalar(value) {
        return None;
    }
    let base = type_text.strip_prefix('*').unwrap_or(type_text);
    let base = if base == "string" {
        TypeRef::String
    } else {
        TypeRef::Any
    };
    Some(scalar_literal(&base, value))
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
