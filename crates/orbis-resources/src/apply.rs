//! Lookups against loaded resources.
//!
//! An absent (empty) resource never restricts anything: an empty lense
//! admits every key, an empty filter drops nothing, an empty mapping keeps
//! every key as is.

use std::collections::{HashMap, HashSet};

use tracing::debug;

/// True if `key` passes the lense.
pub fn apply_lense(lense: &HashSet<String>, key: &str) -> bool {
    if !lense.is_empty() && !lense.contains(key) {
        debug!("Not in lense: {key}");
        return false;
    }
    true
}

/// True if `surface_form` must be filtered out.
pub fn apply_filter(filter: &HashSet<String>, surface_form: &str) -> bool {
    if !filter.is_empty() && filter.contains(surface_form) {
        debug!("{surface_form} will be filtered");
        return true;
    }
    false
}

/// The canonical form of `key`, or `key` itself when it is not remapped.
pub fn apply_mapping<'a>(mapping: &'a HashMap<String, String>, key: &'a str) -> &'a str {
    match mapping.get(key) {
        Some(target) if !target.is_empty() => {
            debug!("{key} remapped to {target}");
            target.as_str()
        }
        _ => key,
    }
}
