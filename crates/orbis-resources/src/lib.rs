//! Orbis evaluation resources.
//!
//! Lenses, mappings and filters arrive as bulky text/JSON artifacts. This
//! crate converts them once into compact cache files, loads and merges the
//! caches a run asks for, and answers the lookups the evaluation needs:
//!
//! - **lense**: is an entity URI in scope?
//! - **filter**: must a surface form be dropped?
//! - **mapping**: what is the canonical URI of a redirect alias?
//!
//! # Example
//! ```no_run
//! use orbis_resources::{ResourceCache, ResourceLayout};
//!
//! let cache = ResourceCache::new(ResourceLayout::new("data"));
//! let mappings = cache.load_mappings(&["redirects-v2.json-2018-04-01"], false)?;
//! # Ok::<(), orbis_resources::ResourceError>(())
//! ```

pub mod apply;
pub mod cache;
pub mod check;
pub mod convert;
pub mod error;
pub mod kind;
pub mod layout;
pub mod progress;
pub mod resource;
pub mod resource_set;

pub use apply::{apply_filter, apply_lense, apply_mapping};
pub use cache::{CacheFreshnessPolicy, PresencePolicy, ResourceCache, SourceNewerPolicy};
pub use check::{check_resources, check_run_configs};
pub use convert::convert;
pub use error::{ResourceError, Result};
pub use kind::ResourceKind;
pub use layout::{cache_path_for_source, ResourceLayout, CACHE_EXTENSION};
pub use progress::{BarProgress, ConversionProgress, LogProgress, NoProgress};
pub use resource::CachedResource;
pub use resource_set::{RequestedResources, ResourceSet};
