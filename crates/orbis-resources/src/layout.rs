//! On-disk layout of raw and cached resources.
//!
//! ```text
//! <data_dir>/lenses/<name>.xz      <data_dir>/lenses/<name>.bin
//! <data_dir>/mappings/<name>.xz    <data_dir>/mappings/<name>.bin
//! <data_dir>/filters/<name>.txt    <data_dir>/filters/<name>.bin
//! ```

use std::path::{Path, PathBuf};

use crate::kind::ResourceKind;

/// Extension of converted (cached) resources.
pub const CACHE_EXTENSION: &str = "bin";

#[derive(Debug, Clone)]
pub struct ResourceLayout {
    data_dir: PathBuf,
}

impl ResourceLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn kind_dir(&self, kind: ResourceKind) -> PathBuf {
        self.data_dir.join(kind.dir_name())
    }

    pub fn source_path(&self, kind: ResourceKind, name: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{name}.{}", kind.source_extension()))
    }

    pub fn cache_path(&self, kind: ResourceKind, name: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{name}.{CACHE_EXTENSION}"))
    }
}

/// Sibling cache path of a source artifact: source suffix swapped for the cache suffix.
pub fn cache_path_for_source(source: &Path) -> PathBuf {
    source.with_extension(CACHE_EXTENSION)
}
