//! Entity type classification.
//!
//! Candidate type URIs of an entity (from a [`TypeSource`] such as a SPARQL
//! endpoint) are matched against per-category regex matchers and reduced to
//! one [`EntityType`] by majority vote.

pub mod category;
pub mod classifier;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod sparql;

pub use category::{EntityType, TypeCategory};
pub use classifier::{TypeClassifier, TypeTally};
pub use error::{Result, TypeError};
pub use matcher::{MarkerMatcher, RegexTypeMatcher, TypeMatcher};
pub use normalize::{normalize_entity_type, normalize_tags};
pub use resolver::EntityTypeResolver;
pub use sparql::{SparqlTypeSource, TypeSource};
