#![deny(missing_docs)]

//! # DTO Generator Core
//!
//! Compiles OpenAPI schema components plus a control manifest into the
//! resolved type model consumed by the provider templates.
//!
//! The pipeline is a single pass over an index that is loaded once and
//! then only borrowed:
//! 1. `oas::registry` loads every schema document into a `SchemaIndex`.
//! 2. `oas::schemas` synthesizes DTO definitions and helper types.
//! 3. `resources` assembles resource definitions from the manifest.
//! 4. `compiler` ties the stages together and checks for dangling names.

/// Shared error types.
pub mod error;

/// Identifier canonicalization.
pub mod naming;

/// Target type representation.
pub mod type_mapping;

/// Descriptions and default literals.
pub mod metadata;

/// Generated type model.
pub mod dto;

/// OpenAPI schema loading and type synthesis.
pub mod oas;

/// Control manifest parsing.
pub mod manifest;

/// Resource definition assembly.
pub mod resources;

/// Pipeline entry points.
pub mod compiler;

pub use compiler::{compile, compile_with, dangling_references, synthesize_types, CompiledModel};
pub use dto::{Annotation, EnumValue, FieldDefinition, FieldTag, TypeDefinition, TypeShape};
pub use error::{AppError, AppResult};
pub use manifest::{load_manifest, ControlManifest, FieldOverride, ResourceSpec};
pub use oas::{SchemaIndex, SchemaNode, TypeSynthesizer};
pub use resources::{assemble_resource, assemble_resources, resolve_control_type, ResourceDefinition};
pub use type_mapping::TypeRef;
