//! Majority-vote classification of an entity's type URIs.
//!
//! Every candidate URI is counted under the first matcher that accepts it
//! (organisation, person, location, then the not-in-wiki marker). The
//! category with the highest count wins; on equal counts the category that
//! comes later in [`TypeCategory::ALL`] wins, and a category needs at least
//! one hit to be chosen at all.

use std::collections::HashMap;

use orbis_common::TypePatterns;
use tracing::{debug, warn};

use crate::category::{EntityType, TypeCategory};
use crate::error::Result;
use crate::matcher::{MarkerMatcher, RegexTypeMatcher, TypeMatcher};

/// Per-category hit counts of one candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTally {
    counts: HashMap<TypeCategory, usize>,
    /// URIs no matcher accepted.
    pub unmatched: Vec<String>,
}

impl TypeTally {
    pub fn count(&self, category: TypeCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    fn record(&mut self, category: TypeCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }
}

pub struct TypeClassifier {
    matchers: Vec<Box<dyn TypeMatcher>>,
}

impl TypeClassifier {
    /// Matchers are tried in the given order.
    pub fn new(matchers: Vec<Box<dyn TypeMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn from_patterns(patterns: &TypePatterns) -> Result<Self> {
        let base = patterns.base_pattern.as_str();
        let matchers: Vec<Box<dyn TypeMatcher>> = vec![
            Box::new(RegexTypeMatcher::new(TypeCategory::Organisation, base, &patterns.organization)?),
            Box::new(RegexTypeMatcher::new(TypeCategory::Person, base, &patterns.person)?),
            Box::new(RegexTypeMatcher::new(TypeCategory::Location, base, &patterns.location)?),
            Box::new(MarkerMatcher::new(patterns.not_in_wiki_marker.clone())),
        ];
        Ok(Self::new(matchers))
    }

    fn match_uri(&self, uri: &str) -> Option<TypeCategory> {
        self.matchers.iter().find(|m| m.matches(uri)).map(|m| m.category())
    }

    pub fn tally<S: AsRef<str>>(&self, uris: &[S]) -> TypeTally {
        let mut tally = TypeTally::default();
        for uri in uris {
            let uri = uri.as_ref();
            match self.match_uri(uri) {
                Some(category) => tally.record(category),
                None => tally.unmatched.push(uri.to_string()),
            }
        }

        debug!(
            organisation = tally.count(TypeCategory::Organisation),
            person = tally.count(TypeCategory::Person),
            location = tally.count(TypeCategory::Location),
            not_in_wiki = tally.count(TypeCategory::NotInWiki),
            unmatched = tally.unmatched.len(),
            "Entity type pattern matching results"
        );
        tally
    }

    /// Most frequent category; `NotFound` unless some category has a hit.
    pub fn most_mentioned(&self, tally: &TypeTally) -> TypeCategory {
        let mut best = (TypeCategory::NotFound, 1);
        for category in TypeCategory::ALL {
            let count = tally.count(category);
            if count >= best.1 {
                best = (category, count);
            }
        }
        best.0
    }

    /// Category of the first URI any matcher accepts.
    pub fn first_best<S: AsRef<str>>(&self, uris: &[S]) -> Option<TypeCategory> {
        uris.iter().find_map(|uri| self.match_uri(uri.as_ref()))
    }

    /// Majority-vote entity type of `uris`.
    pub fn categorize<S: AsRef<str>>(&self, uris: &[S]) -> EntityType {
        let category = self.most_mentioned(&self.tally(uris));
        finish(Some(category))
    }

    /// Entity type of the first recognised URI.
    pub fn categorize_first_best<S: AsRef<str>>(&self, uris: &[S]) -> EntityType {
        finish(self.first_best(uris))
    }
}

fn finish(category: Option<TypeCategory>) -> EntityType {
    let entity_type = category.map(EntityType::from).unwrap_or(EntityType::NoType);
    if entity_type == EntityType::NoType {
        warn!("No entity type found");
    } else {
        debug!(%entity_type, "Entity type found");
    }
    entity_type
}
