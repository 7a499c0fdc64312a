//! Resource cache manager.
//!
//! Ensures every requested resource has a converted cache file, then loads
//! and merges the caches of one resource kind into a single resource.
//! Whether a cache must be (re)built is decided by a [`CacheFreshnessPolicy`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::convert::convert;
use crate::error::{ResourceError, Result};
use crate::kind::ResourceKind;
use crate::layout::ResourceLayout;
use crate::progress::{ConversionProgress, NoProgress};
use crate::resource::CachedResource;

/// Decides whether a cache file has to be rebuilt from its source.
pub trait CacheFreshnessPolicy {
    fn needs_conversion(&self, source: &Path, cache: &Path, refresh: bool) -> bool;
}

/// A cache is fresh iff it exists and no refresh was requested.
///
/// Changes to the source are not detected; pass `refresh` after replacing one.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresencePolicy;

impl CacheFreshnessPolicy for PresencePolicy {
    fn needs_conversion(&self, _source: &Path, cache: &Path, refresh: bool) -> bool {
        refresh || !cache.exists()
    }
}

/// Like [`PresencePolicy`], but also rebuilds when the source was modified
/// after the cache was written.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceNewerPolicy;

impl CacheFreshnessPolicy for SourceNewerPolicy {
    fn needs_conversion(&self, source: &Path, cache: &Path, refresh: bool) -> bool {
        if refresh || !cache.exists() {
            return true;
        }
        let modified = |p: &Path| std::fs::metadata(p).and_then(|m| m.modified()).ok();
        match (modified(source), modified(cache)) {
            (Some(source_time), Some(cache_time)) => source_time > cache_time,
            _ => false,
        }
    }
}

pub struct ResourceCache {
    layout: ResourceLayout,
    policy: Box<dyn CacheFreshnessPolicy>,
    progress: Box<dyn ConversionProgress>,
}

impl ResourceCache {
    /// Presence-based freshness, no progress output.
    pub fn new(layout: ResourceLayout) -> Self {
        Self {
            layout,
            policy: Box::new(PresencePolicy),
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_policy(mut self, policy: impl CacheFreshnessPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_progress(mut self, progress: impl ConversionProgress + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn layout(&self) -> &ResourceLayout {
        &self.layout
    }

    /// Make sure `name` has a usable cache file, converting its source if needed.
    pub fn ensure(&self, kind: ResourceKind, name: &str, refresh: bool) -> Result<PathBuf> {
        let cache = self.layout.cache_path(kind, name);
        let source = self.layout.source_path(kind, name);

        if !self.policy.needs_conversion(&source, &cache, refresh) {
            debug!(kind = %kind, name, "Cache found");
            return Ok(cache);
        }

        if refresh {
            debug!(kind = %kind, name, "Reconverting because of refresh request");
        } else if !cache.exists() {
            debug!(kind = %kind, cache = %cache.display(), "Reconverting because cache not found");
        } else {
            debug!(kind = %kind, name, "Reconverting stale cache");
        }

        if !source.is_file() {
            return Err(ResourceError::MissingSource { kind, path: source });
        }

        info!(kind = %kind, source = %source.display(), "Converting {kind} to cache");
        convert(kind, &source, self.progress.as_ref())
    }

    /// Ensure and load every name, merging in order (later names win).
    ///
    /// An empty `names` yields an empty resource of that kind.
    pub fn ensure_and_load<S: AsRef<str>>(
        &self,
        kind: ResourceKind,
        names: &[S],
        refresh: bool,
    ) -> Result<CachedResource> {
        let started = Instant::now();
        info!("Starting: {}", capitalize(kind.as_str()));

        let mut merged = CachedResource::empty(kind);
        for name in names {
            let name = name.as_ref();
            let cache = self.ensure(kind, name, refresh)?;
            let resource = CachedResource::read(&cache, kind)?;
            debug!(kind = %kind, name, entries = resource.len(), "Loaded cache");
            merged.merge(resource);
        }

        info!(
            entries = merged.len(),
            "Runtime: ({}) ({kind})",
            format_runtime(started.elapsed())
        );
        Ok(merged)
    }

    pub fn load_lenses<S: AsRef<str>>(&self, names: &[S], refresh: bool) -> Result<HashSet<String>> {
        Ok(self.ensure_and_load(ResourceKind::Lense, names, refresh)?.into_set())
    }

    pub fn load_mappings<S: AsRef<str>>(&self, names: &[S], refresh: bool) -> Result<HashMap<String, String>> {
        Ok(self.ensure_and_load(ResourceKind::Mapping, names, refresh)?.into_mapping())
    }

    pub fn load_filters<S: AsRef<str>>(&self, names: &[S], refresh: bool) -> Result<HashSet<String>> {
        Ok(self.ensure_and_load(ResourceKind::Filter, names, refresh)?.into_set())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `hh:mm:ss.ss`
fn format_runtime(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;
    format!("{:0>2}:{:0>2}:{:05.2}", hours as u64, minutes as u64, seconds)
}
