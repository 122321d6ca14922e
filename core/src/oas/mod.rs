#![deny(missing_docs)]

//! # OpenAPI Schema Module
//!
//! - **models**: typed schema node representation.
//! - **normalization**: header wrapping for bare schema fragments.
//! - **ref_utils**: reducing `$ref` pointers to schema names.
//! - **registry**: the aggregated schema index.
//! - **schemas**: type synthesis from schema nodes.

pub mod models;
pub mod normalization;
pub mod ref_utils;
pub mod registry;
pub mod schemas;

pub use models::{RefOr, Reference, SchemaNode};
pub use ref_utils::ref_to_schema_name;
pub use registry::{parse_document, SchemaIndex};
pub use schemas::{SynthesizedType, TypeSynthesizer};
