#![deny(missing_docs)]

//! # Resource Assembly
//!
//! Combines the control manifest with the schema index into one
//! `ResourceDefinition` per declared resource. No I/O happens here.
//!
//! A field override that names a type uses it verbatim. A bare override is
//! typed by looking the field up on the resource schema (own properties,
//! then `allOf` members), then as a global schema named after the field,
//! then as `<Resource><Field>`, and finally by the field name itself.

use crate::dto::{annotation_lines, Annotation, FieldDefinition, FieldTag};
use crate::manifest::{ControlManifest, FieldOverride, ResourceSpec};
use crate::metadata::{
    node_description, normalize_description, override_default_literal, schema_default,
    schema_description,
};
use crate::naming::{lower_camel, to_exported_name};
use crate::oas::models::{RefOr, SchemaNode};
use crate::oas::ref_utils::ref_to_schema_name;
use crate::oas::registry::SchemaIndex;
use crate::type_mapping::{is_optional_type_string, TypeRef};
use serde::Serialize;
use tracing::{debug, warn};

/// The only input field that is required when nothing else says so.
const REQUIRED_INPUT: &str = "Spec";

/// A resource ready for template emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource name as declared in the manifest.
    pub name: String,
    /// Target package path.
    pub package: String,
    /// Source API package.
    pub api_package: String,
    /// Final path segment of `api_package`.
    pub api_package_id: String,
    /// Resource is not scoped to a workspace.
    pub without_workspace: bool,
    /// Resource ships hand-written conversion code.
    pub with_custom_generators: bool,
    /// Input fields in override order.
    pub inputs: Vec<FieldDefinition>,
    /// Output fields in override order.
    pub outputs: Vec<FieldDefinition>,
    /// Normalized description of the resource schema.
    pub description: Option<String>,
    /// Annotation lines for the inputs.
    pub input_annotations: Vec<Annotation>,
    /// Annotation lines for the outputs.
    pub output_annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// Assembles every resource of `manifest`, in declaration order.
/// Resources without a target package are skipped.
pub fn assemble_resources(index: &SchemaIndex, manifest: &ControlManifest) -> Vec<ResourceDefinition> {
    manifest
        .resources
        .iter()
        .filter_map(|(name, spec)| {
            if spec.package.is_empty() {
                warn!(resource = %name, "resource has no package, skipping");
                return None;
            }
            Some(assemble_resource(index, name, spec))
        })
        .collect()
}

/// Assembles one resource.
pub fn assemble_resource(index: &SchemaIndex, name: &str, spec: &ResourceSpec) -> ResourceDefinition {
    let inputs: Vec<FieldDefinition> = spec
        .input
        .iter()
        .map(|field| build_field(index, name, field, Direction::Input))
        .collect();
    let outputs: Vec<FieldDefinition> = spec
        .output
        .iter()
        .map(|field| build_field(index, name, field, Direction::Output))
        .collect();

    // annotations target the emitted struct field, i.e. the exported name
    let input_annotations = annotation_lines(None, inputs.iter().filter(|f| f.annotate));
    let output_annotations = annotation_lines(None, outputs.iter().filter(|f| f.annotate));
    debug!(resource = %name, inputs = inputs.len(), outputs = outputs.len(), "assembled resource");

    ResourceDefinition {
        name: name.to_string(),
        package: spec.package.clone(),
        api_package: spec.api_package.clone(),
        api_package_id: spec.api_package.rsplit('/').next().unwrap_or_default().to_string(),
        without_workspace: spec.without_workspace,
        with_custom_generators: spec.with_custom_generators,
        inputs,
        outputs,
        description: index.lookup(name).and_then(node_description),
        input_annotations,
        output_annotations,
    }
}

fn build_field(
    index: &SchemaIndex,
    resource: &str,
    field: &FieldOverride,
    direction: Direction,
) -> FieldDefinition {
    let explicit = field.type_name.as_deref();
    let optional = match (explicit, direction) {
        (Some(text), _) => is_optional_type_string(text),
        (None, Direction::Input) => field.name != REQUIRED_INPUT,
        (None, Direction::Output) => false,
    };

    let ty = match explicit {
        Some(text) => TypeRef::Verbatim(text.to_string()),
        None => {
            let named = TypeRef::named(resolve_control_type(index, resource, &field.name));
            if optional {
                named.make_optional()
            } else {
                named
            }
        }
    };

    let (description, default, annotate) = if field.has_override() {
        match &field.description {
            Some(text) => (
                normalize_description(text),
                override_default_literal(explicit.unwrap_or_default(), field.default.as_ref()),
                true,
            ),
            // overrides without a description get no annotation
            None => (None, None, false),
        }
    } else {
        let property = resource_property(index, resource, &field.name);
        (
            property.and_then(|p| schema_description(index, p)),
            property.and_then(|p| schema_default(index, p)),
            true,
        )
    };

    FieldDefinition {
        name: field.name.clone(),
        exported_name: to_exported_name(&field.name),
        ty,
        optional,
        tag: FieldTag::new(lower_camel(&field.name), optional),
        description,
        default,
        annotate,
    }
}

/// Resolves the type name of a bare field override.
///
/// Exhausting every candidate yields the field name itself, so generation
/// is never blocked by an incomplete schema set.
pub fn resolve_control_type(index: &SchemaIndex, resource: &str, field: &str) -> String {
    if let Some(name) = property_type_name(index, resource, field) {
        return to_exported_name(&name);
    }
    if index.lookup(field).is_some() {
        return to_exported_name(field);
    }
    let compound = format!("{}{}", resource, field);
    if index.lookup(&compound).is_some() {
        return to_exported_name(&compound);
    }
    to_exported_name(field)
}

fn property_type_name(index: &SchemaIndex, resource: &str, field: &str) -> Option<String> {
    match resource_property(index, resource, field)? {
        RefOr::Ref(r) => Some(ref_to_schema_name(&r.ref_location)),
        RefOr::T(node) => node
            .single_all_of_ref()
            .map(|r| ref_to_schema_name(&r.ref_location)),
    }
}

/// Finds the property backing `field` on the resource schema, by its
/// lower-camel name, in the schema's own properties and then its `allOf`
/// members.
fn resource_property<'a>(
    index: &'a SchemaIndex,
    resource: &str,
    field: &str,
) -> Option<&'a RefOr<SchemaNode>> {
    let schema = index.lookup(resource)?;
    let prop = lower_camel(field);
    if let Some(found) = schema.properties.get(&prop) {
        return Some(found);
    }
    schema
        .all_of
        .iter()
        .filter_map(|member| index.resolve_ref_or(member))
        .find_map(|member| member.properties.get(&prop))
}
