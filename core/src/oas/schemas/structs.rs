#![deny(missing_docs)]

//! # Record Flattening
//!
//! Builds record DTOs from object schemas and `allOf` compositions.
//!
//! Properties are collected from the node itself and then from each
//! `allOf` member in order (references are followed one level). A member
//! that is a union without properties contributes its variants as
//! optional fields. When the same property arrives from several sources
//! it is optional only if every source left it optional.

use crate::dto::{FieldDefinition, FieldTag, TypeDefinition};
use crate::error::AppResult;
use crate::metadata::{node_description, schema_default, schema_description};
use crate::naming::to_exported_name;
use crate::oas::models::{RefOr, SchemaNode};
use crate::oas::ref_utils::ref_to_schema_name;
use crate::oas::schemas::enums::enum_definition;
use crate::oas::schemas::{is_empty_schema, TypeSynthesizer};
use crate::type_mapping::TypeRef;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::warn;

impl TypeSynthesizer<'_> {
    /// Builds the record DTO for `node`.
    ///
    /// Enums and map aliases are still recognised here, so helpers minted
    /// for inline `allOf` compositions get the same classification as
    /// named schemas. A schema with nothing to flatten becomes an alias of
    /// its own type (a distinct one when it is documented).
    pub fn record_definition(&mut self, name: &str, node: &SchemaNode) -> AppResult<TypeDefinition> {
        let type_name = to_exported_name(name);
        if let Some(def) = enum_definition(name, node) {
            return Ok(def);
        }
        if let Some(target) = self.map_alias(node)? {
            return Ok(TypeDefinition::alias(type_name, target));
        }
        if is_empty_schema(node) {
            let target = self.type_of_node(node, false)?;
            return Ok(match node_description(node) {
                Some(description) => TypeDefinition::distinct_alias(type_name, target, description),
                None => TypeDefinition::alias(type_name, target),
            });
        }

        let index = self.index;
        let mut required: HashSet<&str> = node.required.iter().map(String::as_str).collect();
        for member in &node.all_of {
            if let Some(resolved) = index.resolve_ref_or(member) {
                required.extend(resolved.required.iter().map(String::as_str));
            }
        }

        let mut fields = IndexMap::new();
        self.add_properties(name, node, &required, &mut fields)?;
        for member in &node.all_of {
            match member {
                RefOr::Ref(r) => {
                    let Some(target) = index.resolve(r) else {
                        warn!(schema = %name, reference = %r.ref_location, "unresolvable allOf member");
                        continue;
                    };
                    self.enter(&ref_to_schema_name(&r.ref_location))?;
                    let merged = self.add_properties(name, target, &required, &mut fields);
                    self.leave();
                    merged?;
                }
                RefOr::T(inline) => self.add_properties(name, inline, &required, &mut fields)?,
            }
        }

        Ok(TypeDefinition::record(
            type_name,
            node_description(node),
            fields.into_values().collect(),
        ))
    }

    fn add_properties(
        &mut self,
        parent: &str,
        source: &SchemaNode,
        required: &HashSet<&str>,
        fields: &mut IndexMap<String, FieldDefinition>,
    ) -> AppResult<()> {
        if !source.has_properties() {
            if source.is_union() {
                self.fold_union(source, fields)?;
            }
            return Ok(());
        }

        let index = self.index;
        for (prop, schema) in &source.properties {
            let optional = !required.contains(prop.as_str());
            let mut ty = self.property_type(parent, prop, schema)?;

            if let Some(existing) = fields.get_mut(prop) {
                merge_optionality(existing, optional, prop.clone());
                continue;
            }

            if optional {
                ty = ty.make_optional();
            }
            fields.insert(
                prop.clone(),
                FieldDefinition {
                    name: prop.clone(),
                    exported_name: to_exported_name(prop),
                    ty,
                    optional,
                    tag: FieldTag::new(prop.clone(), optional),
                    description: schema_description(index, schema),
                    default: schema_default(index, schema),
                    annotate: self.is_annotatable(schema),
                },
            );
        }
        Ok(())
    }

    /// Contributes the variants of a property-less union member as optional
    /// fields.
    fn fold_union(
        &mut self,
        source: &SchemaNode,
        fields: &mut IndexMap<String, FieldDefinition>,
    ) -> AppResult<()> {
        let folded = self.union_definition("", source)?;
        for variant in folded.fields() {
            // an optional variant never tightens a field that already exists
            if fields.contains_key(&variant.name) {
                continue;
            }
            fields.insert(variant.name.clone(), variant.clone());
        }
        Ok(())
    }
}

/// Applies the AND-rule: the merged field is optional only if both sides
/// are. A field that becomes required loses its optional wrapper.
fn merge_optionality(existing: &mut FieldDefinition, optional: bool, tag_name: String) {
    existing.optional = existing.optional && optional;
    if !existing.optional {
        existing.ty = std::mem::replace(&mut existing.ty, TypeRef::Any).strip_optional();
    }
    existing.tag = FieldTag::new(tag_name, existing.optional);
}
