//! Type categories and the labels they resolve to.

use std::fmt;

/// Category a single type URI is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeCategory {
    Organisation,
    Person,
    Location,
    /// The URI carries the "absent from the knowledge graph" marker.
    NotInWiki,
    NotFound,
}

impl TypeCategory {
    /// Vote order. Ties go to the later category.
    pub const ALL: [TypeCategory; 5] = [
        TypeCategory::Organisation,
        TypeCategory::Person,
        TypeCategory::Location,
        TypeCategory::NotInWiki,
        TypeCategory::NotFound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Organisation => "Organisation",
            TypeCategory::Person => "Person",
            TypeCategory::Location => "Location",
            TypeCategory::NotInWiki => "notInWiki",
            TypeCategory::NotFound => "notFound",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final entity type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityType {
    Organisation,
    Person,
    Location,
    NoType,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Organisation => "Organisation",
            EntityType::Person => "Person",
            EntityType::Location => "Location",
            EntityType::NoType => "NoType",
        }
    }
}

impl From<TypeCategory> for EntityType {
    fn from(category: TypeCategory) -> Self {
        match category {
            TypeCategory::Organisation => EntityType::Organisation,
            TypeCategory::Person => EntityType::Person,
            TypeCategory::Location => EntityType::Location,
            TypeCategory::NotInWiki | TypeCategory::NotFound => EntityType::NoType,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_wiki_and_not_found_have_no_type() {
        assert_eq!(EntityType::from(TypeCategory::NotInWiki), EntityType::NoType);
        assert_eq!(EntityType::from(TypeCategory::NotFound), EntityType::NoType);
        assert_eq!(EntityType::from(TypeCategory::Person), EntityType::Person);
    }

    #[test]
    fn test_labels() {
        assert_eq!(EntityType::Organisation.to_string(), "Organisation");
        assert_eq!(EntityType::NoType.to_string(), "NoType");
        assert_eq!(TypeCategory::NotInWiki.to_string(), "notInWiki");
    }
}
