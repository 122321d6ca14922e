#![deny(missing_docs)]

//! # Schema Models
//!
//! Typed representation of the OpenAPI schema subset the compiler reads.
//!
//! Documents are deserialized from `serde_json::Value` (YAML is converted
//! first), so property order is the declared order thanks to `preserve_order`.
//! Nodes are immutable after load; every consumer borrows them.
//!
//! Node keywords are read leniently: a keyword whose value has the wrong
//! shape is treated as absent instead of failing the whole document.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A `$ref` pointer, e.g. `#/components/schemas/Instance`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    /// The raw pointer string.
    #[serde(rename = "$ref")]
    pub ref_location: String,
}

impl Reference {
    /// Creates a reference from a pointer string.
    pub fn new(ref_location: impl Into<String>) -> Self {
        Self {
            ref_location: ref_location.into(),
        }
    }
}

/// Either a reference or an inline value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ $ref: ... }`
    Ref(Reference),
    /// Inline definition.
    T(T),
}

/// The declared `type` of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
}

impl PrimitiveType {
    /// Parses a JSON Schema type keyword. `null` and unknown keywords yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// The JSON Schema keyword for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// The `additionalProperties` policy of an object node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    FreeForm(bool),
    /// `additionalProperties: { schema }`
    Schema(Box<RefOr<SchemaNode>>),
}

/// Structural classification of a node, in resolution precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Has `anyOf` members (wins over `oneOf`).
    AnyOf,
    /// Has `oneOf` members.
    OneOf,
    /// Has `allOf` members.
    AllOf,
    /// `type: array`
    Array,
    /// `type: object`
    Object,
    /// `type: string`
    String,
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: boolean`
    Boolean,
    /// No composition and no declared type.
    Untyped,
}

/// One parsed schema node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared primitive type (first non-null entry when `type` is a list).
    #[serde(rename = "type", deserialize_with = "deserialize_schema_type")]
    pub schema_type: Option<PrimitiveType>,
    /// Optional title, used to name union variants.
    #[serde(deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    /// Free-text description.
    #[serde(deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    /// Named properties in declaration order.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub properties: IndexMap<String, RefOr<SchemaNode>>,
    /// Names of required properties.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub required: Vec<String>,
    /// Array item schema (the first entry of a tuple-form list).
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Option<Box<RefOr<SchemaNode>>>,
    /// Map value policy.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Enum literals.
    #[serde(rename = "enum", deserialize_with = "deserialize_lenient")]
    pub enum_values: Vec<Value>,
    /// Companion constant names for `enum_values` (`x-enumNames`).
    #[serde(rename = "x-enumNames", deserialize_with = "deserialize_enum_names")]
    pub enum_names: Vec<String>,
    /// Default literal as written in the document.
    pub default: Option<Value>,
    /// `allOf` members.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub all_of: Vec<RefOr<SchemaNode>>,
    /// `anyOf` members.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub any_of: Vec<RefOr<SchemaNode>>,
    /// `oneOf` members.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub one_of: Vec<RefOr<SchemaNode>>,
}

impl SchemaNode {
    /// Classifies the node.
    pub fn kind(&self) -> NodeKind {
        if !self.any_of.is_empty() {
            return NodeKind::AnyOf;
        }
        if !self.one_of.is_empty() {
            return NodeKind::OneOf;
        }
        if !self.all_of.is_empty() {
            return NodeKind::AllOf;
        }
        match self.schema_type {
            Some(PrimitiveType::Array) => NodeKind::Array,
            Some(PrimitiveType::Object) => NodeKind::Object,
            Some(PrimitiveType::String) => NodeKind::String,
            Some(PrimitiveType::Integer) => NodeKind::Integer,
            Some(PrimitiveType::Number) => NodeKind::Number,
            Some(PrimitiveType::Boolean) => NodeKind::Boolean,
            None => NodeKind::Untyped,
        }
    }

    /// True when the node has `anyOf` or `oneOf` members.
    pub fn is_union(&self) -> bool {
        !self.any_of.is_empty() || !self.one_of.is_empty()
    }

    /// True when the node uses any composition keyword.
    pub fn is_composite(&self) -> bool {
        self.is_union() || !self.all_of.is_empty()
    }

    /// The union members, `anyOf` taking precedence over `oneOf`.
    pub fn union_members(&self) -> &[RefOr<SchemaNode>] {
        if self.any_of.is_empty() {
            &self.one_of
        } else {
            &self.any_of
        }
    }

    /// The sole `allOf` member when the node is a single-parent composition.
    pub fn single_all_of(&self) -> Option<&RefOr<SchemaNode>> {
        if self.all_of.len() == 1 && !self.is_union() {
            self.all_of.first()
        } else {
            None
        }
    }

    /// The referenced parent of a single-parent composition.
    pub fn single_all_of_ref(&self) -> Option<&Reference> {
        match self.single_all_of() {
            Some(RefOr::Ref(r)) => Some(r),
            _ => None,
        }
    }

    /// True when the node declares at least one named property.
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// True when the node has enum literals with a matching companion name list.
    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty() && self.enum_names.len() == self.enum_values.len()
    }

    /// True when `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// `components` section of a document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Components {
    /// Named schemas in declaration order.
    pub schemas: IndexMap<String, RefOr<SchemaNode>>,
}

/// Minimal `info` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    /// Document title.
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub title: String,
    /// Document version (`1.0` unquoted is read as text).
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub version: String,
}

/// A parsed schema document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaDocument {
    /// The `openapi` version marker.
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub openapi: String,
    /// Document metadata.
    #[serde(default)]
    pub info: DocumentInfo,
    /// Component definitions.
    #[serde(default)]
    pub components: Option<Components>,
}

fn deserialize_schema_type<'de, D>(deserializer: D) -> Result<Option<PrimitiveType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let first = match value {
        Some(Value::String(s)) => PrimitiveType::from_keyword(&s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .find_map(PrimitiveType::from_keyword),
        _ => None,
    };
    Ok(first)
}

fn deserialize_enum_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items.iter().map(scalar_text).collect())
}

/// Reads the keyword as `T`, falling back to `T::default()` on a shape mismatch.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => Some(scalar_text(&v)),
        _ => None,
    })
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Option<Box<RefOr<SchemaNode>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(scalar_text).unwrap_or_default())
}

/// Returns the textual form of a scalar (`"a"` -> `a`, `1` -> `1`).
/// Composite values render as compact JSON.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
