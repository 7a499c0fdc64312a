//! Entity URI to entity type, via a [`TypeSource`] and a [`TypeClassifier`].

use tracing::{debug, warn};

use crate::category::EntityType;
use crate::classifier::TypeClassifier;
use crate::error::Result;
use crate::sparql::TypeSource;

pub struct EntityTypeResolver<S: TypeSource> {
    source: S,
    classifier: TypeClassifier,
    first_best: bool,
}

impl<S: TypeSource> EntityTypeResolver<S> {
    pub fn new(source: S, classifier: TypeClassifier) -> Self {
        Self {
            source,
            classifier,
            first_best: false,
        }
    }

    /// Decide by the first recognised type URI instead of a majority vote.
    pub fn with_first_best(mut self, first_best: bool) -> Self {
        self.first_best = first_best;
        self
    }

    pub fn resolve(&self, uri: &str, check_redirect: bool) -> Result<EntityType> {
        let target = if check_redirect {
            self.source.redirect_of(uri)?
        } else {
            None
        };
        let uri = match target.as_deref() {
            Some(target) => {
                debug!(from = uri, to = target, "Following redirect");
                target
            }
            None => uri,
        };

        let types = self.source.types_of(uri)?;
        if types.is_empty() {
            debug!(uri, "No type URIs");
            return Ok(EntityType::NoType);
        }

        Ok(if self.first_best {
            self.classifier.categorize_first_best(&types)
        } else {
            self.classifier.categorize(&types)
        })
    }

    /// Like [`resolve`](Self::resolve), but a failed lookup yields `NoType`.
    pub fn resolve_or_no_type(&self, uri: &str, check_redirect: bool) -> EntityType {
        self.resolve(uri, check_redirect).unwrap_or_else(|e| {
            warn!(uri, error = %e, "Entity type lookup failed");
            EntityType::NoType
        })
    }
}
