#![deny(missing_docs)]

//! # DTO Model
//!
//! The resolved type model handed to the template stage.
//!
//! A `TypeDefinition` has exactly one shape: a field list, an alias, or an
//! enumeration. Field order is the declared property order of the
//! originating schema.

use crate::type_mapping::TypeRef;
use serde::{Serialize, Serializer};
use std::fmt;

/// The serialization tag of a field, rendered as `pulumi:"name,optional"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    /// Wire name.
    pub name: String,
    /// Whether the field may be omitted.
    pub optional: bool,
}

impl FieldTag {
    /// Creates a tag.
    pub fn new(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
        }
    }

    /// The tag body without the `pulumi:` key, e.g. `spec,optional`.
    pub fn body(&self) -> String {
        if self.optional {
            format!("{},optional", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pulumi:\"{}\"", self.body())
    }
}

impl Serialize for FieldTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One generated documentation/initialization line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Attach a description to the type (`field: None`) or to one field.
    Describe {
        /// Exported field name, or `None` for the type itself.
        field: Option<String>,
        /// Normalized description.
        text: String,
    },
    /// Set a field's default.
    SetDefault {
        /// Exported field name.
        field: String,
        /// Rendered literal.
        literal: String,
    },
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Describe { field: None, text } => {
                write!(f, "a.Describe(&dto, {})", crate::metadata::quote(text))
            }
            Self::Describe {
                field: Some(field),
                text,
            } => write!(
                f,
                "a.Describe(&dto.{}, {})",
                field,
                crate::metadata::quote(text)
            ),
            Self::SetDefault { field, literal } => {
                write!(f, "a.SetDefault(&dto.{}, {})", field, literal)
            }
        }
    }
}

impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A field of a record-shaped DTO.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Property name as written in the schema.
    pub name: String,
    /// Canonical exported identifier.
    pub exported_name: String,
    /// Resolved type (already wrapped when optional).
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Whether the field may be omitted.
    pub optional: bool,
    /// Serialization tag.
    pub tag: FieldTag,
    /// Normalized description.
    pub description: Option<String>,
    /// Rendered default literal.
    pub default: Option<String>,
    /// Whether the field's own type carries annotations worth delegating to.
    pub annotate: bool,
}

impl FieldDefinition {
    /// True when a scalar default was materialised.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// One enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Companion name as declared (`x-enumNames`).
    pub name: String,
    /// Generated constant identifier (type-prefixed).
    pub const_name: String,
    /// Rendered literal.
    pub literal: String,
}

/// The mutually exclusive shapes of a DTO.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeShape {
    /// A record with ordered fields.
    Fields {
        /// Fields in declaration order.
        fields: Vec<FieldDefinition>,
    },
    /// A pass-through alias (`distinct: false`) or a new named type over
    /// `target` (`distinct: true`).
    Alias {
        /// Aliased type.
        target: TypeRef,
        /// Whether the alias introduces a distinct named type.
        distinct: bool,
    },
    /// Named constants over a base type.
    Enum {
        /// Underlying type of the constants.
        base: TypeRef,
        /// Constants in declaration order.
        values: Vec<EnumValue>,
    },
}

/// A generated type definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    /// Canonical type name.
    pub name: String,
    /// The definition's shape.
    pub shape: TypeShape,
    /// Normalized description.
    pub description: Option<String>,
    /// Whether annotation output is generated for this type.
    pub annotate: bool,
    /// Annotation lines (empty unless `annotate`).
    pub annotations: Vec<Annotation>,
}

impl TypeDefinition {
    /// A record DTO; annotation lines are derived from the descriptions and
    /// defaults present.
    pub fn record(
        name: impl Into<String>,
        description: Option<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        let annotations = annotation_lines(description.as_deref(), &fields);
        Self {
            name: name.into(),
            shape: TypeShape::Fields { fields },
            description,
            annotate: true,
            annotations,
        }
    }

    /// A transparent alias.
    pub fn alias(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::Alias {
                target,
                distinct: false,
            },
            description: None,
            annotate: false,
            annotations: Vec::new(),
        }
    }

    /// A distinct named type over `target`, documented with `description`.
    pub fn distinct_alias(name: impl Into<String>, target: TypeRef, description: String) -> Self {
        let annotations = annotation_lines(Some(description.as_str()), std::iter::empty());
        Self {
            name: name.into(),
            shape: TypeShape::Alias {
                target,
                distinct: true,
            },
            description: Some(description),
            annotate: true,
            annotations,
        }
    }

    /// An enumeration.
    pub fn enumeration(name: impl Into<String>, base: TypeRef, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::Enum { base, values },
            description: None,
            annotate: false,
            annotations: Vec::new(),
        }
    }

    /// The record fields, empty for aliases and enums.
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.shape {
            TypeShape::Fields { fields } => fields,
            _ => &[],
        }
    }

    /// Every DTO name this definition refers to.
    pub fn named_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match &self.shape {
            TypeShape::Fields { fields } => {
                for field in fields {
                    field.ty.named_refs(&mut out);
                }
            }
            TypeShape::Alias { target, .. } => target.named_refs(&mut out),
            TypeShape::Enum { base, .. } => base.named_refs(&mut out),
        }
        out
    }
}

/// Builds the describe/default lines for a type and its fields.
pub fn annotation_lines<'f>(
    description: Option<&str>,
    fields: impl IntoIterator<Item = &'f FieldDefinition>,
) -> Vec<Annotation> {
    let mut lines = Vec::new();
    if let Some(text) = description {
        lines.push(Annotation::Describe {
            field: None,
            text: text.to_string(),
        });
    }
    for field in fields {
        if let Some(text) = &field.description {
            lines.push(Annotation::Describe {
                field: Some(field.exported_name.clone()),
                text: text.clone(),
            });
        }
        if let Some(literal) = &field.default {
            lines.push(Annotation::SetDefault {
                field: field.exported_name.clone(),
                literal: literal.clone(),
            });
        }
    }
    lines
}
