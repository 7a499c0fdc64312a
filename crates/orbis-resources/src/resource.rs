//! Converted resources and their cache file format.
//!
//! A cache file is a bincode-encoded [`CachedResource`]. Ordered containers
//! keep the encoding deterministic, so converting the same source twice
//! produces byte-identical files.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{ResourceError, Result};
use crate::kind::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachedResource {
    /// Entity URIs considered in scope.
    Lense(BTreeSet<String>),
    /// Alias URI -> canonical URI.
    Mapping(BTreeMap<String, String>),
    /// Surface forms to drop.
    Filter(BTreeSet<String>),
}

impl CachedResource {
    pub fn empty(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Lense => CachedResource::Lense(BTreeSet::new()),
            ResourceKind::Mapping => CachedResource::Mapping(BTreeMap::new()),
            ResourceKind::Filter => CachedResource::Filter(BTreeSet::new()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            CachedResource::Lense(_) => ResourceKind::Lense,
            CachedResource::Mapping(_) => ResourceKind::Mapping,
            CachedResource::Filter(_) => ResourceKind::Filter,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CachedResource::Lense(set) | CachedResource::Filter(set) => set.len(),
            CachedResource::Mapping(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union `other` into `self`; on key collisions `other` wins.
    pub fn merge(&mut self, other: CachedResource) {
        match (self, other) {
            (CachedResource::Lense(a), CachedResource::Lense(b))
            | (CachedResource::Filter(a), CachedResource::Filter(b)) => a.extend(b),
            (CachedResource::Mapping(a), CachedResource::Mapping(b)) => a.extend(b),
            (this, other) => tracing::warn!(
                expected = %this.kind(),
                found = %other.kind(),
                "Skipping merge of mismatched resource kinds"
            ),
        }
    }

    /// Membership view: set entries, or mapping aliases.
    pub fn into_set(self) -> HashSet<String> {
        match self {
            CachedResource::Lense(set) | CachedResource::Filter(set) => set.into_iter().collect(),
            CachedResource::Mapping(map) => map.into_keys().collect(),
        }
    }

    /// Mapping view: mapping entries, or identity pairs for sets.
    pub fn into_mapping(self) -> HashMap<String, String> {
        match self {
            CachedResource::Mapping(map) => map.into_iter().collect(),
            CachedResource::Lense(set) | CachedResource::Filter(set) => {
                set.into_iter().map(|k| (k.clone(), k)).collect()
            }
        }
    }

    /// Write the cache file, replacing any previous one as a whole.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ResourceError::io(parent, e))?;
        }

        let tmp = path.with_extension("bin.partial");
        let written = self.write_partial(&tmp).and_then(|()| {
            fs::rename(&tmp, path).map_err(|e| ResourceError::io(path, e))
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    fn write_partial(&self, tmp: &Path) -> Result<()> {
        let file = File::create(tmp).map_err(|e| ResourceError::io(tmp, e))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self).map_err(|source| ResourceError::Cache {
            path: tmp.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|e| ResourceError::io(tmp, e))
    }

    /// Read a cache file and check it holds a resource of `expected` kind.
    pub fn read(path: &Path, expected: ResourceKind) -> Result<Self> {
        let file = File::open(path).map_err(|e| ResourceError::io(path, e))?;
        let resource: CachedResource = bincode::deserialize_from(BufReader::new(file))
            .map_err(|source| ResourceError::Cache {
                path: path.to_path_buf(),
                source,
            })?;

        if resource.kind() != expected {
            return Err(ResourceError::CacheKindMismatch {
                path: path.to_path_buf(),
                expected,
                found: resource.kind(),
            });
        }
        Ok(resource)
    }
}
