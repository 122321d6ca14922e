#![deny(missing_docs)]

//! # Compiler
//!
//! Runs the whole pipeline: schema index, control manifest, type
//! synthesis, resource assembly, and the dangling-reference check.
//!
//! The result is deterministic: types follow schema index order, each
//! schema's own definition directly followed by the helpers it minted;
//! resources follow manifest order.

use crate::dto::TypeDefinition;
use crate::error::AppResult;
use crate::manifest::{load_manifest, ControlManifest};
use crate::oas::registry::SchemaIndex;
use crate::oas::schemas::{SynthesizedType, TypeSynthesizer};
use crate::resources::{assemble_resources, ResourceDefinition};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// The resolved model handed to the template stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledModel {
    /// SDK version from the manifest.
    pub sdk_version: Option<String>,
    /// Every generated type definition, free of duplicate names.
    pub types: Vec<TypeDefinition>,
    /// Every assembled resource.
    pub resources: Vec<ResourceDefinition>,
    /// Type names referenced but never defined.
    pub dangling: Vec<String>,
}

/// Compiles the schemas under `schema_root` against the manifest at
/// `manifest_path`.
///
/// Unparseable schema documents are skipped; an unreadable manifest aborts.
pub fn compile(schema_root: &Path, manifest_path: &Path) -> AppResult<CompiledModel> {
    let index = SchemaIndex::load_dir(schema_root)?;
    let manifest = load_manifest(manifest_path)?;
    compile_with(&index, &manifest)
}

/// Compiles already loaded inputs.
pub fn compile_with(index: &SchemaIndex, manifest: &ControlManifest) -> AppResult<CompiledModel> {
    let types = synthesize_types(index, &manifest.resource_names());
    let resources = assemble_resources(index, manifest);
    let dangling = dangling_references(&types, &resources);

    debug!(
        types = types.len(),
        resources = resources.len(),
        dangling = dangling.len(),
        "compiled model"
    );
    Ok(CompiledModel {
        sdk_version: manifest.sdk_version.clone(),
        types,
        resources,
        dangling,
    })
}

/// Synthesizes a definition for every indexed schema not in `skip`.
///
/// A schema that fails (reference cycle) is logged and left out. Helpers
/// never take a named schema's name (see `TypeSynthesizer`); otherwise the
/// first definition of a name wins over later ones.
pub fn synthesize_types(index: &SchemaIndex, skip: &HashSet<&str>) -> Vec<TypeDefinition> {
    let mut synth = TypeSynthesizer::new(index);
    let mut built: Vec<SynthesizedType> = Vec::new();

    for name in index.names() {
        if skip.contains(name) {
            debug!(schema = %name, "schema is a resource, not emitted as a type");
            continue;
        }
        let Some(node) = index.lookup(name) else {
            warn!(schema = %name, "schema alias does not resolve, skipping");
            continue;
        };
        match synth.build_types(name, node) {
            Ok(out) => built.push(out),
            Err(e) => warn!(schema = %name, error = %e, "skipping type"),
        }
    }

    let mut emitted: HashSet<String> = HashSet::new();
    let mut types = Vec::new();

    for out in built {
        let def = out.definition;
        if def.name.is_empty() {
            warn!("schema name has no identifier characters, skipping");
        } else if emitted.insert(def.name.clone()) {
            types.push(def);
        } else {
            warn!(type_name = %def.name, "duplicate type name, keeping the first");
        }

        for helper in out.helpers {
            if emitted.insert(helper.name.clone()) {
                types.push(helper);
            }
        }
    }
    types
}

/// Every `Named` type reference in `types` and `resources` that has no
/// definition. Resource names count as defined.
pub fn dangling_references(types: &[TypeDefinition], resources: &[ResourceDefinition]) -> Vec<String> {
    let defined: HashSet<&str> = types
        .iter()
        .map(|t| t.name.as_str())
        .chain(resources.iter().map(|r| r.name.as_str()))
        .collect();

    let mut referenced: Vec<&str> = Vec::new();
    for def in types {
        referenced.extend(def.named_refs());
    }
    for resource in resources {
        for field in resource.inputs.iter().chain(&resource.outputs) {
            field.ty.named_refs(&mut referenced);
        }
    }

    let mut seen = HashSet::new();
    let mut dangling = Vec::new();
    for name in referenced {
        if !defined.contains(name) && seen.insert(name) {
            warn!(type_name = %name, "type referenced but never defined");
            dangling.push(name.to_string());
        }
    }
    dangling
}
