use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use orbis_common::AggregatorInput;

use crate::error::ResourceError;

/// The three resource types a run can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Set of in-scope entity URIs.
    Lense,
    /// Alias URI -> canonical URI redirect table.
    Mapping,
    /// Set of surface forms to drop.
    Filter,
}

impl ResourceKind {
    /// Scan order used by the configuration check.
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Lense, ResourceKind::Mapping, ResourceKind::Filter];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Lense => "lense",
            ResourceKind::Mapping => "mapping",
            ResourceKind::Filter => "filter",
        }
    }

    /// Directory below the data dir, also the run config key.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ResourceKind::Lense => "lenses",
            ResourceKind::Mapping => "mappings",
            ResourceKind::Filter => "filters",
        }
    }

    /// Extension of the raw source artifact.
    pub fn source_extension(&self) -> &'static str {
        match self {
            ResourceKind::Lense | ResourceKind::Mapping => "xz",
            ResourceKind::Filter => "txt",
        }
    }

    /// Resource names a run config declares for this kind.
    pub fn names_in<'a>(&self, input: &'a AggregatorInput) -> &'a [String] {
        match self {
            ResourceKind::Lense => input.lenses(),
            ResourceKind::Mapping => input.mappings(),
            ResourceKind::Filter => input.filters(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lense" | "lenses" | "lens" => Ok(ResourceKind::Lense),
            "mapping" | "mappings" => Ok(ResourceKind::Mapping),
            "filter" | "filters" => Ok(ResourceKind::Filter),
            other => Err(ResourceError::UnknownKind(other.to_string())),
        }
    }
}
