#![deny(missing_docs)]

//! # Type Mapping
//!
//! The target-language type representation produced by the synthesizer.
//!
//! Types are kept structured while the model is built and rendered to the
//! provider's Go syntax only through `Display`:
//! - `string`, `int64`, `int`, `float64`, `bool`, `any`
//! - `[]T`, `map[string]T`, `*T`
//! - named DTOs and manifest-supplied verbatim strings as written

use crate::oas::models::PrimitiveType;
use serde::{Serialize, Serializer};
use std::fmt;

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Text.
    String,
    /// 64-bit integer.
    Integer,
    /// Platform integer (enum base type).
    Int,
    /// Floating point.
    Float,
    /// Boolean.
    Boolean,
    /// Dynamic value.
    Any,
    /// Ordered sequence of `T`.
    Sequence(Box<TypeRef>),
    /// String-keyed map of `T`.
    Map(Box<TypeRef>),
    /// Optional `T`.
    Optional(Box<TypeRef>),
    /// A generated DTO, by canonical name.
    Named(String),
    /// A type string supplied verbatim by the control manifest.
    Verbatim(String),
}

impl TypeRef {
    /// A reference to a named DTO.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `[]inner`
    pub fn sequence(inner: TypeRef) -> Self {
        Self::Sequence(Box::new(inner))
    }

    /// `map[string]inner`
    pub fn map(inner: TypeRef) -> Self {
        Self::Map(Box::new(inner))
    }

    /// The base type of an enum declared with `primitive`.
    pub fn enum_base(primitive: Option<PrimitiveType>) -> Self {
        match primitive {
            Some(PrimitiveType::Integer) => Self::Int,
            Some(PrimitiveType::Number) => Self::Float,
            Some(PrimitiveType::Boolean) => Self::Boolean,
            _ => Self::String,
        }
    }

    /// Wraps the type as optional. Sequences, maps, and types that are
    /// already optional are returned unchanged.
    pub fn make_optional(self) -> Self {
        match self {
            Self::Optional(_) | Self::Sequence(_) | Self::Map(_) => self,
            Self::Verbatim(ref text)
                if is_optional_type_string(text)
                    || text.starts_with("[]")
                    || text.starts_with("map[") =>
            {
                self
            }
            other => Self::Optional(Box::new(other)),
        }
    }

    /// Removes one optional layer, if present.
    pub fn strip_optional(self) -> Self {
        match self {
            Self::Optional(inner) => *inner,
            Self::Verbatim(text) => match text.strip_prefix('*') {
                Some(rest) => Self::Verbatim(rest.to_string()),
                None => Self::Verbatim(text),
            },
            other => other,
        }
    }

    /// True when the type is optional-shaped.
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Optional(_) => true,
            Self::Verbatim(text) => is_optional_type_string(text),
            _ => false,
        }
    }

    /// Collects every DTO name this type mentions.
    pub fn named_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Named(name) => out.push(name),
            Self::Sequence(inner) | Self::Map(inner) | Self::Optional(inner) => {
                inner.named_refs(out)
            }
            _ => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("int64"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float64"),
            Self::Boolean => f.write_str("bool"),
            Self::Any => f.write_str("any"),
            Self::Sequence(inner) => write!(f, "[]{}", inner),
            Self::Map(inner) => write!(f, "map[string]{}", inner),
            Self::Optional(inner) => write!(f, "*{}", inner),
            Self::Named(name) | Self::Verbatim(name) => f.write_str(name),
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// True when a manifest-supplied type string is pointer/optional shaped.
pub fn is_optional_type_string(text: &str) -> bool {
    text.contains('*') || text.starts_with("Option<")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_primitives() {
        assert_eq!(TypeRef::String.to_string(), "string");
        assert_eq!(TypeRef::Integer.to_string(), "int64");
        assert_eq!(TypeRef::Float.to_string(), "float64");
        assert_eq!(TypeRef::Boolean.to_string(), "bool");
        assert_eq!(TypeRef::Any.to_string(), "any");
    }

    #[test]
    fn test_render_composites() {
        let t = TypeRef::map(TypeRef::sequence(TypeRef::named("Zone")));
        assert_eq!(t.to_string(), "map[string][]Zone");
        assert_eq!(
            TypeRef::named("Zone").make_optional().to_string(),
            "*Zone"
        );
    }

    #[test]
    fn test_make_optional_is_idempotent() {
        let once = TypeRef::String.make_optional();
        let twice = once.clone().make_optional();
        assert_eq!(once, twice);
        assert!(once.is_optional());
    }

    #[test]
    fn test_collections_are_never_wrapped() {
        let seq = TypeRef::sequence(TypeRef::String);
        assert_eq!(seq.clone().make_optional(), seq);
        let map = TypeRef::map(TypeRef::Any);
        assert_eq!(map.clone().make_optional(), map);
        let verbatim = TypeRef::Verbatim("[]string".into());
        assert_eq!(verbatim.clone().make_optional(), verbatim);
    }

    #[test]
    fn test_strip_optional_removes_one_layer() {
        let t = TypeRef::named("Spec").make_optional();
        assert_eq!(t.strip_optional(), TypeRef::named("Spec"));
        assert_eq!(
            TypeRef::Verbatim("*string".into()).strip_optional(),
            TypeRef::Verbatim("string".into())
        );
        assert_eq!(TypeRef::Any.strip_optional(), TypeRef::Any);
    }

    #[test]
    fn test_enum_base() {
        assert_eq!(TypeRef::enum_base(Some(PrimitiveType::Integer)), TypeRef::Int);
        assert_eq!(TypeRef::enum_base(Some(PrimitiveType::Number)), TypeRef::Float);
        assert_eq!(TypeRef::enum_base(None), TypeRef::String);
        assert_eq!(TypeRef::enum_base(Some(PrimitiveType::Object)), TypeRef::String);
    }

    #[test]
    fn test_named_refs() {
        let t = TypeRef::map(TypeRef::sequence(TypeRef::named("Disk"))).make_optional();
        let mut names = Vec::new();
        t.named_refs(&mut names);
        assert_eq!(names, vec!["Disk"]);
    }

    #[test]
    fn test_serializes_as_rendered_string() {
        let json = serde_json::to_string(&TypeRef::sequence(TypeRef::Integer)).unwrap();
        assert_eq!(json, "\"[]int64\"");
    }
}
