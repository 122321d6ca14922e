#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Identifier canonicalization for generated type, field, and constant names.

/// Converts a schema or property name into an exported identifier.
///
/// Runs of ASCII alphanumerics are kept, every other character is a word
/// break, and the first letter after a break is upper-cased. Inner casing
/// is preserved (`CPUInfo` stays `CPUInfo`). A leading digit gets a
/// `Field` prefix so the result is always a valid identifier.
///
/// e.g. `network-interface` -> `NetworkInterface`, `2fa` -> `Field2fa`
pub fn to_exported_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            upper_next = true;
            continue;
        }
        if out.is_empty() && c.is_ascii_digit() {
            out.push_str("Field");
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Lower-cases the first character only.
///
/// e.g. `BlockStorage` -> `blockStorage`
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the name of a helper type minted for property `prop` of `parent`.
pub fn helper_type_name(parent: &str, prop: &str) -> String {
    format!("{}{}", to_exported_name(parent), to_exported_name(prop))
}

/// Guesses an enum type name from one of its constant names by cutting
/// before the last upper-case letter.
///
/// e.g. `StatusActive` -> `Status`
pub fn enum_type_from_name(name: &str) -> String {
    match name.rfind(|c: char| c.is_ascii_uppercase()) {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

/// Builds the identifier of an enum constant, prefixing the type name
/// unless the companion name already carries it.
pub fn enum_const_name(type_name: &str, enum_name: &str) -> String {
    if enum_name.is_empty() {
        return type_name.to_string();
    }
    if type_name.is_empty() || enum_name.starts_with(type_name) {
        return enum_name.to_string();
    }
    format!("{}{}", type_name, enum_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_name() {
        assert_eq!(to_exported_name("network-interface"), "NetworkInterface");
        assert_eq!(to_exported_name("blockStorage"), "BlockStorage");
        assert_eq!(to_exported_name("CPUInfo"), "CPUInfo");
        assert_eq!(to_exported_name("snake_case_name"), "SnakeCaseName");
        assert_eq!(to_exported_name("2fa"), "Field2fa");
        assert_eq!(to_exported_name(""), "");
        assert_eq!(to_exported_name("--"), "");
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("Spec"), "spec");
        assert_eq!(lower_camel("BlockStorage"), "blockStorage");
        assert_eq!(lower_camel(""), "");
    }

    #[test]
    fn test_helper_type_name() {
        assert_eq!(helper_type_name("instance", "boot-volume"), "InstanceBootVolume");
    }

    #[test]
    fn test_enum_type_from_name() {
        assert_eq!(enum_type_from_name("StatusActive"), "Status");
        assert_eq!(enum_type_from_name("lower"), "lower");
        assert_eq!(enum_type_from_name("Active"), "");
    }

    #[test]
    fn test_enum_const_name() {
        assert_eq!(enum_const_name("Priority", "Low"), "PriorityLow");
        assert_eq!(enum_const_name("Priority", "PriorityHigh"), "PriorityHigh");
        assert_eq!(enum_const_name("", "Low"), "Low");
        assert_eq!(enum_const_name("Priority", ""), "Priority");
    }
}
