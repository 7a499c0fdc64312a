//! Error types for resource conversion and loading.

use std::path::PathBuf;
use thiserror::Error;

use crate::kind::ResourceKind;

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("No source to convert found for {kind}: {}", path.display())]
    MissingSource { kind: ResourceKind, path: PathBuf },

    #[error("Cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache file {} is unusable: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("Cache file {} holds a {found}, expected a {expected}", path.display())]
    CacheKindMismatch {
        path: PathBuf,
        expected: ResourceKind,
        found: ResourceKind,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown resource type: {0}")]
    UnknownKind(String),

    #[error(transparent)]
    Config(#[from] orbis_common::ConfigError),
}

impl ResourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResourceError::Io { path: path.into(), source }
    }
}
