#![deny(missing_docs)]

//! # Enum Extraction
//!
//! Builds enumeration DTOs from `enum` literals paired with `x-enumNames`.

use crate::dto::{EnumValue, TypeDefinition};
use crate::metadata::scalar_literal;
use crate::naming::{enum_const_name, enum_type_from_name, to_exported_name};
use crate::oas::models::SchemaNode;
use crate::type_mapping::TypeRef;

/// Builds the enum definition of `node`, named after `name`.
///
/// Returns `None` unless every literal has a companion name. An empty
/// `name` falls back to the first companion name with its last word cut
/// off (`StatusActive` -> `Status`); if that is empty too the node is not
/// treated as an enum.
pub(crate) fn enum_definition(name: &str, node: &SchemaNode) -> Option<TypeDefinition> {
    if !node.is_enum() {
        return None;
    }
    let base = TypeRef::enum_base(node.schema_type);

    let mut type_name = to_exported_name(name);
    if type_name.is_empty() {
        type_name = enum_type_from_name(node.enum_names.first()?);
    }
    if type_name.is_empty() {
        return None;
    }

    let values = node
        .enum_values
        .iter()
        .zip(&node.enum_names)
        .map(|(value, companion)| EnumValue {
            name: companion.clone(),
            const_name: enum_const_name(&type_name, companion),
            literal: scalar_literal(&base, value),
        })
        .collect();

    Some(TypeDefinition::enumeration(type_name, base, values))
}
