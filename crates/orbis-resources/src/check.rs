//! Resource check for a batch of run configurations.
//!
//! Walks every run config, makes sure every lense, mapping and filter it
//! names has a cache file (converting sources on demand), then loads the
//! union of all requested resources into one [`ResourceSet`].

use std::path::PathBuf;

use orbis_common::RunConfig;
use tracing::{debug, info};

use crate::cache::ResourceCache;
use crate::error::Result;
use crate::kind::ResourceKind;
use crate::resource_set::{RequestedResources, ResourceSet};

/// Load every config file and check its resources. Fails on the first error.
pub fn check_resources(cache: &ResourceCache, configs: &[PathBuf], refresh: bool) -> Result<ResourceSet> {
    let mut loaded = Vec::with_capacity(configs.len());
    for config_file in configs {
        debug!("Loading config file: {}", config_file.display());
        loaded.push(RunConfig::load(config_file)?);
    }
    check_run_configs(cache, &loaded, refresh)
}

/// Check already parsed run configs.
pub fn check_run_configs(cache: &ResourceCache, configs: &[RunConfig], refresh: bool) -> Result<ResourceSet> {
    info!("Checking for resources");

    let mut requested = RequestedResources::default();
    for config in configs {
        for kind in ResourceKind::ALL {
            debug!("Working on: {}", kind.dir_name());
            let names = kind.names_in(&config.aggregator.input);

            if names.is_empty() {
                debug!("No {} resources needed: {}", kind.dir_name(), config.file_name);
                continue;
            }

            for name in names {
                // Each resource is converted at most once per check, even with refresh.
                if requested.push(kind, name) {
                    cache.ensure(kind, name, refresh)?;
                }
            }
        }
    }

    // Conversion (and refresh) already happened above.
    ResourceSet::load(cache, &requested, false)
}
