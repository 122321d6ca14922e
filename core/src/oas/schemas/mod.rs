#![deny(missing_docs)]

//! # Type Synthesis
//!
//! Turns `components/schemas` entries into DTO definitions.
//!
//! Defines logic to:
//! - Classify a named schema as enum, map alias, union, or record.
//! - Resolve property schemas to target types, minting helper types for
//!   inline compositions and enums.
//! - Merge `allOf` members into one record (see `structs`).
//! - Build union records with one optional field per member (see `unions`).
//!
//! Helper types are cached by derived name for the whole run, so
//! resolving the same parent/property pair twice never duplicates a
//! definition. A derived name that is already taken by a named schema
//! gets a numeric suffix.

pub mod enums;
pub mod structs;
pub mod unions;

use crate::dto::{TypeDefinition, TypeShape};
use crate::error::{AppError, AppResult};
use crate::naming::{helper_type_name, to_exported_name};
use crate::oas::models::{AdditionalProperties, NodeKind, PrimitiveType, RefOr, Reference, SchemaNode};
use crate::oas::ref_utils::ref_to_schema_name;
use crate::oas::registry::SchemaIndex;
use crate::oas::schemas::enums::enum_definition;
use crate::type_mapping::TypeRef;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// The definitions produced for one named schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedType {
    /// The schema's own definition.
    pub definition: TypeDefinition,
    /// Helpers first minted while building it, in minting order.
    pub helpers: Vec<TypeDefinition>,
}

/// Run-scoped synthesis state over a borrowed schema index.
#[derive(Debug)]
pub struct TypeSynthesizer<'a> {
    index: &'a SchemaIndex,
    helpers: IndexMap<String, TypeDefinition>,
    // exported names of every indexed schema
    reserved: HashSet<String>,
    resolving: Vec<String>,
}

impl<'a> TypeSynthesizer<'a> {
    /// Creates a synthesizer with an empty helper cache.
    pub fn new(index: &'a SchemaIndex) -> Self {
        Self {
            index,
            helpers: IndexMap::new(),
            reserved: index.names().map(to_exported_name).collect(),
            resolving: Vec::new(),
        }
    }

    /// Every helper minted so far.
    pub fn helpers(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.helpers.values()
    }

    /// Builds the definition of the named schema `name`.
    ///
    /// A reference cycle fails this schema only: helpers minted during the
    /// failed attempt are discarded and the synthesizer stays usable.
    pub fn build_types(&mut self, name: &str, node: &SchemaNode) -> AppResult<SynthesizedType> {
        let mark = self.helpers.len();
        self.resolving.clear();
        self.resolving.push(name.to_string());

        let result = self.build_named(name, node);
        self.resolving.clear();

        match result {
            Ok(definition) => {
                let helpers: Vec<TypeDefinition> =
                    self.helpers.values().skip(mark).cloned().collect();
                debug!(schema = %name, helpers = helpers.len(), "synthesized type");
                Ok(SynthesizedType {
                    definition,
                    helpers,
                })
            }
            Err(e) => {
                self.helpers.truncate(mark);
                Err(e)
            }
        }
    }

    fn build_named(&mut self, name: &str, node: &SchemaNode) -> AppResult<TypeDefinition> {
        if let Some(def) = enum_definition(name, node) {
            return Ok(def);
        }
        if let Some(target) = self.map_alias(node)? {
            return Ok(TypeDefinition::alias(to_exported_name(name), target));
        }
        if node.is_union() {
            return self.union_definition(name, node);
        }
        self.record_definition(name, node)
    }

    /// Resolves a schema to a target type without minting helpers.
    ///
    /// With `allow_union` unset, references to union schemas degrade to
    /// `any`.
    pub fn type_of(&mut self, schema: &RefOr<SchemaNode>, allow_union: bool) -> AppResult<TypeRef> {
        match schema {
            RefOr::Ref(r) => self.type_of_ref(r, allow_union),
            RefOr::T(node) => self.type_of_node(node, allow_union),
        }
    }

    fn type_of_ref(&mut self, reference: &Reference, allow_union: bool) -> AppResult<TypeRef> {
        let index = self.index;
        let name = ref_to_schema_name(&reference.ref_location);
        let Some(target) = index.lookup(&name) else {
            warn!(reference = %reference.ref_location, "unresolvable reference, typing as any");
            return Ok(TypeRef::Any);
        };

        if let Some(def) = enum_definition(&name, target) {
            return Ok(TypeRef::Named(def.name));
        }
        if target.is_union() {
            return Ok(if allow_union {
                TypeRef::named(to_exported_name(&name))
            } else {
                TypeRef::Any
            });
        }
        if is_simple_alias(target) {
            return Ok(TypeRef::named(to_exported_name(&name)));
        }

        let ty = match target.schema_type {
            Some(PrimitiveType::String) => TypeRef::String,
            Some(PrimitiveType::Integer) => TypeRef::Int,
            Some(PrimitiveType::Number) => TypeRef::Float,
            Some(PrimitiveType::Boolean) => TypeRef::Boolean,
            Some(PrimitiveType::Array) => match &target.items {
                Some(items) => {
                    self.enter(&name)?;
                    let inner = self.type_of(items, allow_union);
                    self.leave();
                    TypeRef::sequence(inner?)
                }
                None => TypeRef::sequence(TypeRef::Any),
            },
            Some(PrimitiveType::Object) | None => TypeRef::named(to_exported_name(&name)),
        };
        Ok(ty)
    }

    fn type_of_node(&mut self, node: &SchemaNode, allow_union: bool) -> AppResult<TypeRef> {
        if let Some(member) = node.single_all_of() {
            return self.type_of(member, allow_union);
        }
        if let Some(TypeDefinition {
            shape: TypeShape::Enum { base, .. },
            ..
        }) = enum_definition("", node)
        {
            return Ok(base);
        }

        match node.kind() {
            NodeKind::AnyOf | NodeKind::OneOf => Ok(TypeRef::Any),
            NodeKind::AllOf | NodeKind::Array | NodeKind::Object => {
                self.type_of_declared(node, allow_union)
            }
            NodeKind::String => Ok(TypeRef::String),
            NodeKind::Integer => Ok(TypeRef::Integer),
            NodeKind::Number => Ok(TypeRef::Float),
            NodeKind::Boolean => Ok(TypeRef::Boolean),
            NodeKind::Untyped => Ok(self.map_alias(node)?.unwrap_or(TypeRef::Any)),
        }
    }

    /// Types a node by its declared primitive alone, ignoring composition.
    fn type_of_declared(&mut self, node: &SchemaNode, allow_union: bool) -> AppResult<TypeRef> {
        match node.schema_type {
            Some(PrimitiveType::String) => Ok(TypeRef::String),
            Some(PrimitiveType::Integer) => Ok(TypeRef::Integer),
            Some(PrimitiveType::Number) => Ok(TypeRef::Float),
            Some(PrimitiveType::Boolean) => Ok(TypeRef::Boolean),
            Some(PrimitiveType::Array) => match &node.items {
                Some(items) => Ok(TypeRef::sequence(self.type_of(items, allow_union)?)),
                None => Ok(TypeRef::sequence(TypeRef::Any)),
            },
            Some(PrimitiveType::Object) => {
                Ok(self.map_alias(node)?.unwrap_or(TypeRef::map(TypeRef::Any)))
            }
            None => Ok(self.map_alias(node)?.unwrap_or(TypeRef::Any)),
        }
    }

    /// Resolves property `prop` of `parent`, minting a helper type for inline
    /// enums and compositions.
    pub fn property_type(
        &mut self,
        parent: &str,
        prop: &str,
        schema: &RefOr<SchemaNode>,
    ) -> AppResult<TypeRef> {
        let node = match schema {
            RefOr::Ref(r) => return self.type_of_ref(r, true),
            RefOr::T(node) => node,
        };
        if let Some(r) = node.single_all_of_ref() {
            return self.type_of_ref(r, true);
        }

        let helper_name = self.free_helper_name(helper_type_name(parent, prop));
        if let Some(def) = enum_definition(&helper_name, node) {
            return Ok(TypeRef::Named(self.remember_helper(def)));
        }
        if node.is_composite() {
            let def = if node.is_union() {
                self.union_definition(&helper_name, node)?
            } else {
                self.record_definition(&helper_name, node)?
            };
            return Ok(TypeRef::Named(self.remember_helper(def)));
        }
        self.type_of_node(node, true)
    }

    /// `derived`, or the first `derived{n}` not claimed by a named schema.
    fn free_helper_name(&self, derived: String) -> String {
        if !self.reserved.contains(&derived) {
            return derived;
        }
        let renamed = (2..)
            .map(|n| format!("{}{}", derived, n))
            .find(|candidate| !self.reserved.contains(candidate))
            .unwrap_or_default();
        debug!(helper = %derived, renamed = %renamed, "helper name taken by a named schema");
        renamed
    }

    /// Caches a helper under its name and returns the name. A name already
    /// cached keeps its first definition.
    fn remember_helper(&mut self, def: TypeDefinition) -> String {
        let name = def.name.clone();
        match self.helpers.get(&name) {
            Some(existing) if *existing != def => {
                warn!(helper = %name, "helper name derived twice for different shapes, keeping the first");
            }
            Some(_) => {}
            None => {
                self.helpers.insert(name.clone(), def);
            }
        }
        name
    }

    /// The `map[string]T` alias of a node that declares only
    /// `additionalProperties`.
    pub fn map_alias(&mut self, node: &SchemaNode) -> AppResult<Option<TypeRef>> {
        if !is_map_alias(node) {
            return Ok(None);
        }
        match &node.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                Ok(Some(TypeRef::map(self.type_of(value, true)?)))
            }
            Some(AdditionalProperties::FreeForm(true)) => Ok(Some(TypeRef::map(TypeRef::Any))),
            _ => Ok(None),
        }
    }

    /// Whether a field of this schema delegates to a type carrying its own
    /// annotations.
    pub fn is_annotatable(&self, schema: &RefOr<SchemaNode>) -> bool {
        let target = match schema {
            RefOr::Ref(r) => self.index.resolve(r),
            RefOr::T(node) => match node.single_all_of_ref() {
                Some(r) => self.index.resolve(r),
                None => Some(node),
            },
        };
        target.is_some_and(is_annotatable_node)
    }

    fn enter(&mut self, name: &str) -> AppResult<()> {
        if self.resolving.iter().any(|n| n == name) {
            let mut chain = self.resolving.clone();
            chain.push(name.to_string());
            return Err(AppError::ReferenceCycle(chain));
        }
        self.resolving.push(name.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.resolving.pop();
    }
}

/// A node that only names a primitive or array type.
pub fn is_simple_alias(node: &SchemaNode) -> bool {
    if node.has_properties() || node.additional_properties.is_some() || node.is_composite() {
        return false;
    }
    matches!(
        node.schema_type,
        Some(
            PrimitiveType::String
                | PrimitiveType::Integer
                | PrimitiveType::Number
                | PrimitiveType::Boolean
                | PrimitiveType::Array
        )
    )
}

/// A node with no properties, no `additionalProperties`, and no composition.
pub fn is_empty_schema(node: &SchemaNode) -> bool {
    !node.has_properties() && node.additional_properties.is_none() && !node.is_composite()
}

/// True when the node qualifies as a `map[string]T` alias.
pub fn is_map_alias(node: &SchemaNode) -> bool {
    let object_or_untyped = matches!(node.schema_type, None | Some(PrimitiveType::Object));
    let map_policy = matches!(
        node.additional_properties,
        Some(AdditionalProperties::Schema(_)) | Some(AdditionalProperties::FreeForm(true))
    );
    object_or_untyped && map_policy && !node.has_properties()
}

fn is_annotatable_node(node: &SchemaNode) -> bool {
    if node.is_enum() || is_map_alias(node) {
        return false;
    }
    node.is_union() || !node.all_of.is_empty() || node.has_properties()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
components:
  schemas:
    Labels:
      type: object
      additionalProperties: { type: string }
    Anything:
      additionalProperties: true
    Zone:
      type: string
    Zones:
      type: array
      items: { $ref: '#/components/schemas/Zone' }
    Priority:
      type: integer
      enum: [1, 2]
      x-enumNames: [Low, High]
    Endpoint:
      oneOf:
        - { type: string }
        - { type: integer }
    Disk:
      type: object
      properties:
        size: { type: integer }
    Ratio:
      type: number
      properties:
        value: { type: number }
    Counter:
      type: integer
      additionalProperties: false
"#;

    fn index() -> SchemaIndex {
        let mut index = SchemaIndex::new();
        index.register_yaml("doc.yaml", DOC).unwrap();
        index
    }

    fn reference(name: &str) -> RefOr<SchemaNode> {
        RefOr::Ref(Reference::new(format!("#/components/schemas/{}", name)))
    }

    fn inline(yaml: &str) -> RefOr<SchemaNode> {
        serde_yaml::from_str::<serde_json::Value>(yaml)
            .map(|v| serde_json::from_value(v).unwrap())
            .unwrap()
    }

    fn ref_type(synth: &mut TypeSynthesizer<'_>, name: &str, allow_union: bool) -> String {
        synth.type_of(&reference(name), allow_union).unwrap().to_string()
    }

    fn inline_type(synth: &mut TypeSynthesizer<'_>, yaml: &str) -> String {
        synth.type_of(&inline(yaml), true).unwrap().to_string()
    }

    #[test]
    fn test_reference_typing() {
        let index = index();
        let mut synth = TypeSynthesizer::new(&index);
        let ty = ref_type;
        assert_eq!(ty(&mut synth, "Zone", true), "Zone");
        assert_eq!(ty(&mut synth, "Zones", true), "Zones");
        assert_eq!(ty(&mut synth, "Priority", true), "Priority");
        assert_eq!(ty(&mut synth, "Endpoint", true), "Endpoint");
        assert_eq!(ty(&mut synth, "Endpoint", false), "any");
        assert_eq!(ty(&mut synth, "Disk", false), "Disk");
        assert_eq!(ty(&mut synth, "Ratio", false), "float64");
        assert_eq!(ty(&mut synth, "Counter", false), "int");
        assert_eq!(ty(&mut synth, "Missing", true), "any");
    }

    #[test]
    fn test_inline_typing() {
        let index = index();
        let mut synth = TypeSynthesizer::new(&index);
        let ty = inline_type;
        assert_eq!(ty(&mut synth, "type: integer"), "int64");
        assert_eq!(ty(&mut synth, "type: array"), "[]any");
        assert_eq!(ty(&mut synth, "type: array\nitems: { type: boolean }"), "[]bool");
        assert_eq!(ty(&mut synth, "type: object"), "map[string]any");
        assert_eq!(
            ty(&mut synth, "type: object\nproperties: { a: { type: string } }"),
            "map[string]any"
        );
        assert_eq!(
            ty(&mut synth, "additionalProperties: { $ref: '#/components/schemas/Endpoint' }"),
            "map[string]Endpoint"
        );
        assert_eq!(ty(&mut synth, "{}"), "any");
        assert_eq!(ty(&mut synth, "anyOf: [{ type: string }]"), "any");
        assert_eq!(
            ty(&mut synth, "allOf: [{ $ref: '#/components/schemas/Disk' }]"),
            "Disk"
        );
        assert_eq!(
            ty(&mut synth, "type: string\nenum: [a]\nx-enumNames: [ModeA]"),
            "string"
        );
    }

    #[test]
    fn test_map_alias_detection() {
        let index = index();
        let mut synth = TypeSynthesizer::new(&index);
        let labels = index.lookup("Labels").unwrap();
        let out = synth.build_types("Labels", labels).unwrap();
        assert_eq!(
            out.definition.shape,
            TypeShape::Alias {
                target: TypeRef::map(TypeRef::String),
                distinct: false
            }
        );

        let anything = index.lookup("Anything").unwrap();
        let out = synth.build_types("Anything", anything).unwrap();
        assert_eq!(out.definition.fields().len(), 0);
        assert!(matches!(
            out.definition.shape,
            TypeShape::Alias { ref target, .. } if target.to_string() == "map[string]any"
        ));

        let not_alias = inline("type: object\nadditionalProperties: false");
        let RefOr::T(node) = not_alias else { unreachable!() };
        assert!(!is_map_alias(&node));
    }

    #[test]
    fn test_property_type_mints_helpers_once() {
        let index = index();
        let mut synth = TypeSynthesizer::new(&index);
        let prop = inline("oneOf: [{ type: string }, { $ref: '#/components/schemas/Disk' }]");
        let first = synth.property_type("instance", "target", &prop).unwrap();
        let second = synth.property_type("instance", "target", &prop).unwrap();
        assert_eq!(first, TypeRef::named("InstanceTarget"));
        assert_eq!(first, second);
        assert_eq!(synth.helpers().count(), 1);

        let enum_prop = inline("type: string\nenum: [on, off]\nx-enumNames: [On, Off]");
        let ty = synth.property_type("instance", "power", &enum_prop).unwrap();
        assert_eq!(ty, TypeRef::named("InstancePower"));
        assert_eq!(synth.helpers().count(), 2);
    }

    #[test]
    fn test_helper_yields_to_named_schema() {
        let mut index = SchemaIndex::new();
        index
            .register_yaml(
                "spec.yaml",
                r#"
components:
  schemas:
    SpecBoot:
      type: boolean
    SpecBoot2:
      type: string
"#,
            )
            .unwrap();
        let mut synth = TypeSynthesizer::new(&index);
        let prop = inline("oneOf: [{ type: string }, { type: integer }]");
        let ty = synth.property_type("Spec", "boot", &prop).unwrap();
        assert_eq!(ty, TypeRef::named("SpecBoot3"));

        let helper = synth.helpers().next().unwrap();
        assert_eq!(helper.name, "SpecBoot3");
        assert_eq!(helper.fields().len(), 2);

        let again = synth.property_type("Spec", "boot", &prop).unwrap();
        assert_eq!(again, ty);
        assert_eq!(synth.helpers().count(), 1);
    }

    #[test]
    fn test_single_parent_property_is_a_reference() {
        let index = index();
        let mut synth = TypeSynthesizer::new(&index);
        let prop = inline("allOf: [{ $ref: '#/components/schemas/Disk' }]\ndescription: Boot disk.");
        let ty = synth.property_type("instance", "boot", &prop).unwrap();
        assert_eq!(ty, TypeRef::named("Disk"));
        assert_eq!(synth.helpers().count(), 0);
    }

    #[test]
    fn test_annotatable() {
        let index = index();
        let synth = TypeSynthesizer::new(&index);
        assert!(synth.is_annotatable(&reference("Disk")));
        assert!(synth.is_annotatable(&reference("Endpoint")));
        assert!(!synth.is_annotatable(&reference("Priority")));
        assert!(!synth.is_annotatable(&reference("Labels")));
        assert!(!synth.is_annotatable(&reference("Zone")));
        assert!(!synth.is_annotatable(&reference("Missing")));
        assert!(synth.is_annotatable(&inline(
            "allOf: [{ $ref: '#/components/schemas/Disk' }]"
        )));
    }

    #[test]
    fn test_simple_alias_and_empty_schema() {
        let index = index();
        assert!(is_simple_alias(index.lookup("Zone").unwrap()));
        assert!(is_simple_alias(index.lookup("Zones").unwrap()));
        assert!(!is_simple_alias(index.lookup("Disk").unwrap()));
        assert!(!is_simple_alias(index.lookup("Counter").unwrap()));
        assert!(is_empty_schema(index.lookup("Zone").unwrap()));
        assert!(!is_empty_schema(index.lookup("Counter").unwrap()));
    }
}
