//! Conservative variable detection.
//!
//! Only document metadata is considered, and only values that can be substituted back
//! without ambiguity. New rules must keep the total under [`MAX_VARIABLES`] so
//! generated templates stay readable.

use crate::model::{DocumentStructure, VariableMap};

pub const MAX_VARIABLES: usize = 7;

pub const DOC_NAME: &str = "DOC_NAME";
pub const OWNER_NAME: &str = "OWNER_NAME";

const DOC_SUFFIX: &str = ".coda";

pub fn detect(structure: &DocumentStructure) -> VariableMap {
    let mut vars = VariableMap::new();

    // Multi-word names are skipped: no single token to substitute
    let base = structure
        .name
        .strip_suffix(DOC_SUFFIX)
        .unwrap_or(&structure.name);
    if !base.is_empty() && !base.chars().any(char::is_whitespace) {
        vars.push((DOC_NAME.to_string(), base.to_string()));
    }

    if !structure.owner_name.trim().is_empty() {
        vars.push((OWNER_NAME.to_string(), structure.owner_name.clone()));
    }

    debug_assert!(vars.len() <= MAX_VARIABLES);
    vars
}
