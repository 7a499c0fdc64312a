//! Entity type label normalization.

use std::collections::HashMap;

/// Normalize a raw type (URI or bare name) to a capitalised label.
///
/// `"http://example.org/ontology/location"` becomes `"Place"`,
/// `"Organisation"` becomes `"Organization"`.
pub fn normalize_entity_type(raw: &str) -> String {
    let last_segment = raw.trim_matches('/').rsplit('/').next().unwrap_or_default();
    let lowered = last_segment.to_lowercase();
    let renamed = match lowered.as_str() {
        "location" => "place",
        "organisation" => "organization",
        other => other,
    };
    capitalize(renamed)
}

/// First character upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Map a gold-standard label to the label the given evaluator uses.
///
/// Exact match only; unknown evaluators and labels pass through unchanged.
pub fn normalize_tags<'a>(
    label: &'a str,
    evaluator: &str,
    entity_maps: &'a HashMap<String, HashMap<String, String>>,
) -> &'a str {
    entity_maps
        .get(evaluator)
        .and_then(|mapping| mapping.get(label))
        .map(String::as_str)
        .unwrap_or(label)
}
