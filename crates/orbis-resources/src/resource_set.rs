//! The resources of one evaluation run.

use std::collections::{HashMap, HashSet};

use crate::apply::{apply_filter, apply_lense, apply_mapping};
use crate::cache::ResourceCache;
use crate::error::Result;
use crate::kind::ResourceKind;

/// Resource names requested by a run, per kind, in request order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedResources {
    pub lenses: Vec<String>,
    pub mappings: Vec<String>,
    pub filters: Vec<String>,
}

impl RequestedResources {
    /// Record `name` for `kind`; returns false if it was already requested.
    pub fn push(&mut self, kind: ResourceKind, name: &str) -> bool {
        let names = match kind {
            ResourceKind::Lense => &mut self.lenses,
            ResourceKind::Mapping => &mut self.mappings,
            ResourceKind::Filter => &mut self.filters,
        };
        if names.iter().any(|n| n == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }
}

/// Merged lenses, mappings and filters of a run.
///
/// Built once per run and passed by reference to whatever needs lookups.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    pub lenses: HashSet<String>,
    pub mappings: HashMap<String, String>,
    pub filters: HashSet<String>,
}

impl ResourceSet {
    /// Ensure and load every requested resource.
    pub fn load(cache: &ResourceCache, requested: &RequestedResources, refresh: bool) -> Result<Self> {
        Ok(Self {
            lenses: cache.load_lenses(&requested.lenses, refresh)?,
            mappings: cache.load_mappings(&requested.mappings, refresh)?,
            filters: cache.load_filters(&requested.filters, refresh)?,
        })
    }

    pub fn is_in_lense(&self, key: &str) -> bool {
        apply_lense(&self.lenses, key)
    }

    pub fn is_filtered(&self, surface_form: &str) -> bool {
        apply_filter(&self.filters, surface_form)
    }

    pub fn remap<'a>(&'a self, key: &'a str) -> &'a str {
        apply_mapping(&self.mappings, key)
    }
}
