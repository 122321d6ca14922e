#![deny(missing_docs)]

//! # Union Records
//!
//! `anyOf` / `oneOf` schemas become records with one optional field per
//! member. Exactly one field is expected to be set; that is not enforced
//! here.

use crate::dto::{FieldDefinition, FieldTag, TypeDefinition};
use crate::error::AppResult;
use crate::metadata::node_description;
use crate::naming::{lower_camel, to_exported_name};
use crate::oas::models::{RefOr, SchemaNode};
use crate::oas::ref_utils::ref_to_schema_name;
use crate::oas::schemas::TypeSynthesizer;
use std::collections::HashSet;

impl TypeSynthesizer<'_> {
    /// Builds the union record for `node` (`anyOf` wins over `oneOf`).
    ///
    /// Variant names come from the member's reference name, title, or
    /// declared type, falling back to `Variant{n}`. A name already taken
    /// gets the first free numeric suffix: `String`, `String2`.
    pub fn union_definition(&mut self, name: &str, node: &SchemaNode) -> AppResult<TypeDefinition> {
        let index = self.index;
        let members = node.union_members();
        let mut taken: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(members.len());

        for (idx, member) in members.iter().enumerate() {
            let variant = variant_name(idx, member);
            let mut exported = to_exported_name(&variant);
            if exported.is_empty() {
                exported = format!("Variant{}", idx + 1);
            }
            if taken.contains(&exported) {
                let base = exported;
                exported = (2..)
                    .map(|n| format!("{}{}", base, n))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_default();
            }
            taken.insert(exported.clone());

            let ty = self.type_of(member, true)?.make_optional();
            fields.push(FieldDefinition {
                name: variant,
                tag: FieldTag::new(lower_camel(&exported), true),
                exported_name: exported,
                ty,
                optional: true,
                description: index.resolve_ref_or(member).and_then(node_description),
                default: None,
                annotate: self.is_annotatable(member),
            });
        }

        Ok(TypeDefinition::record(
            to_exported_name(name),
            node_description(node),
            fields,
        ))
    }
}

fn variant_name(idx: usize, member: &RefOr<SchemaNode>) -> String {
    match member {
        RefOr::Ref(r) => ref_to_schema_name(&r.ref_location),
        RefOr::T(node) => match (&node.title, node.schema_type) {
            (Some(title), _) if !title.is_empty() => title.clone(),
            (_, Some(primitive)) => primitive.as_str().to_string(),
            _ => format!("Variant{}", idx + 1),
        },
    }
}
