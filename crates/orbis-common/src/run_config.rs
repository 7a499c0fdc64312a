//! Evaluation run configuration.
//!
//! A run config is a YAML file describing one evaluation. Only the
//! `aggregator.input` section matters here: it names the lenses, mappings
//! and filters the run needs. Everything else in the file is ignored.
//!
//! ```yaml
//! aggregator:
//!   input:
//!     lenses: [3.5-entity_list_en]
//!     mappings: [redirects-v2.json-2018-04-01]
//!     filters: [us_states_list_en-txt-12_jan_28]
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// File name the config was loaded from (not part of the YAML).
    #[serde(skip)]
    pub file_name: String,

    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub input: AggregatorInput,
}

/// Resource names requested by a run, per resource type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatorInput {
    #[serde(default)]
    pub lenses: Option<Vec<String>>,
    #[serde(default)]
    pub mappings: Option<Vec<String>>,
    #[serde(default)]
    pub filters: Option<Vec<String>>,
}

impl AggregatorInput {
    pub fn lenses(&self) -> &[String] {
        self.lenses.as_deref().unwrap_or_default()
    }

    pub fn mappings(&self) -> &[String] {
        self.mappings.as_deref().unwrap_or_default()
    }

    pub fn filters(&self) -> &[String] {
        self.filters.as_deref().unwrap_or_default()
    }
}

impl RunConfig {
    /// Load a run config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: RunConfig = read_yaml(path)?;
        config.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(file = %config.file_name, "Loaded run config");
        Ok(config)
    }

    /// Parse a run config from a YAML string (tests / embedded configs).
    pub fn from_yaml(file_name: &str, yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut config: RunConfig = serde_yaml::from_str(yaml)?;
        config.file_name = file_name.to_string();
        Ok(config)
    }
}

pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
