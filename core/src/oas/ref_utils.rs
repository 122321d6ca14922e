#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Reduces `$ref` pointers to the bare schema names used as index keys.
//!
//! There is no cross-file traversal: `other.yaml#/components/schemas/Disk`
//! and `#/components/schemas/Disk` both reduce to `Disk`, and the index
//! holds every loaded document's schemas under one namespace.

use percent_encoding::percent_decode_str;

/// Extracts the bare schema name from a reference string.
///
/// Takes the segment after the final `/`, or after `#` when there is no `/`.
/// A trailing separator is ignored so that `#/` never yields an empty name
/// when a better candidate exists.
///
/// e.g. `#/components/schemas/User` -> `User`, `common.yaml#Zone` -> `Zone`
pub fn ref_to_schema_name(ref_loc: &str) -> String {
    if ref_loc.is_empty() {
        return String::new();
    }
    if let Some(idx) = ref_loc.rfind('/') {
        if idx + 1 < ref_loc.len() {
            return decode_pointer_segment(&ref_loc[idx + 1..]);
        }
    }
    if let Some(idx) = ref_loc.rfind('#') {
        if idx + 1 < ref_loc.len() {
            return decode_pointer_segment(&ref_loc[idx + 1..]);
        }
    }
    ref_loc.to_string()
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
