#![deny(missing_docs)]

//! # Control Manifest
//!
//! The YAML document that lists which schemas become resources and how
//! their input/output fields are overridden.
//!
//! ```yaml
//! sdkVersion: v1
//! resources:
//!   Instance:
//!     package: compute/instance
//!     apiPackage: sdk/compute/v1
//!     input:
//!       - Spec
//!       - { Labels: "map[string]string" }
//!     output:
//!       - name: Status
//!         type: "*InstanceStatus"
//!         description: Observed state.
//! ```
//!
//! Resource and field order are kept as declared.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// The parsed control manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlManifest {
    /// SDK version stamped into generated code.
    pub sdk_version: Option<String>,
    /// Resources in declaration order.
    pub resources: IndexMap<String, ResourceSpec>,
}

impl ControlManifest {
    /// Parses a manifest from YAML text.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        parse_manifest(text).map_err(|e| AppError::Manifest(e.to_string()))
    }

    /// Names of every declared resource.
    pub fn resource_names(&self) -> HashSet<&str> {
        self.resources.keys().map(String::as_str).collect()
    }
}

/// Loads the manifest at `path`. Any failure is fatal for the run.
pub fn load_manifest(path: &Path) -> AppResult<ControlManifest> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))?;
    parse_manifest(&text).map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))
}

fn parse_manifest(text: &str) -> Result<ControlManifest, serde_yaml::Error> {
    let manifest: Option<ControlManifest> = serde_yaml::from_str(text)?;
    Ok(manifest.unwrap_or_default())
}

/// One resource entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceSpec {
    /// Target package path; resources without one are not generated.
    pub package: String,
    /// Source API package identifier.
    pub api_package: String,
    /// Resource is not scoped to a workspace.
    pub without_workspace: bool,
    /// Resource ships hand-written conversion code.
    pub with_custom_generators: bool,
    /// Input field overrides in order.
    pub input: Vec<FieldOverride>,
    /// Output field overrides in order.
    pub output: Vec<FieldOverride>,
}

/// A single field override.
///
/// Accepted shapes:
/// - `Spec` (name only, everything else resolved from the schemas)
/// - `{ name, type, description, default }`
/// - `{ Labels: "map[string]string" }` (name and type)
///
/// Unknown record keys are ignored. A mapping that is not a usable record
/// takes its first entry as name and type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverride {
    /// Field name.
    pub name: String,
    /// Explicit type text, used verbatim.
    pub type_name: Option<String>,
    /// Explicit description.
    pub description: Option<String>,
    /// Explicit default value.
    pub default: Option<Value>,
}

impl FieldOverride {
    /// A name-only override.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when anything beyond the name was supplied.
    pub fn has_override(&self) -> bool {
        self.type_name.is_some() || self.description.is_some() || self.default.is_some()
    }
}

#[derive(Deserialize)]
struct FieldRecord {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default: Option<Value>,
}

impl<'de> Deserialize<'de> for FieldOverride {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(name) => Ok(Self::named(name)),
            Value::Object(map) => {
                if let Ok(record) = serde_json::from_value::<FieldRecord>(Value::Object(map.clone())) {
                    let parsed = Self {
                        name: record.name,
                        type_name: non_empty(record.type_name),
                        description: non_empty(record.description),
                        default: record.default.filter(|v| !v.is_null()),
                    };
                    if !parsed.name.is_empty() || parsed.has_override() {
                        return Ok(parsed);
                    }
                }
                if map.len() > 1 {
                    warn!(entries = map.len(), "field mapping has several entries, using the first");
                }
                let Some((name, type_value)) = map.into_iter().next() else {
                    return Err(D::Error::custom("empty field mapping"));
                };
                let type_name = match type_value {
                    Value::String(s) => Some(s),
                    Value::Number(_) | Value::Bool(_) => Some(type_value.to_string()),
                    _ => None,
                };
                Ok(Self {
                    name,
                    type_name: non_empty(type_name),
                    ..Self::default()
                })
            }
            other => Err(D::Error::custom(format!(
                "invalid field override: {}",
                other
            ))),
        }
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.is_empty())
}
