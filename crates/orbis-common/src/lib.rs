//! Settings, run configuration and errors shared across the Orbis crates.

pub mod error;
pub mod run_config;
pub mod settings;

// Re-export commonly used types
pub use error::{ConfigError, Result};
pub use run_config::{AggregatorInput, RunConfig};
pub use settings::{Settings, TypePatterns};
