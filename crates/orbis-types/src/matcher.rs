//! Matchers deciding which category a type URI belongs to.

use regex::Regex;

use crate::category::TypeCategory;
use crate::error::{Result, TypeError};

pub trait TypeMatcher {
    fn category(&self) -> TypeCategory;
    fn matches(&self, uri: &str) -> bool;
}

/// `base_pattern` followed by one of `terms` and an optional numeric suffix,
/// matched at the start of the URI.
///
/// The pieces are concatenated as is and the anchor covers the whole
/// pattern, so a top-level `|` in `base_pattern` splits the full expression.
#[derive(Debug, Clone)]
pub struct RegexTypeMatcher {
    category: TypeCategory,
    regex: Regex,
}

impl RegexTypeMatcher {
    pub fn new(category: TypeCategory, base_pattern: &str, terms: &[String]) -> Result<Self> {
        let pattern = format!("^(?:{base_pattern}(?:{})[0-9]*)", terms.join("|"));
        let regex = Regex::new(&pattern).map_err(|source| TypeError::Pattern { category, source })?;
        Ok(Self { category, regex })
    }
}

impl TypeMatcher for RegexTypeMatcher {
    fn category(&self) -> TypeCategory {
        self.category
    }

    fn matches(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }
}

/// Substring match on the not-in-wiki marker.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    marker: String,
}

impl MarkerMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }
}

impl TypeMatcher for MarkerMatcher {
    fn category(&self) -> TypeCategory {
        TypeCategory::NotInWiki
    }

    fn matches(&self, uri: &str) -> bool {
        uri.contains(&self.marker)
    }
}
