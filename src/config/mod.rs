//! Configuration system for modelhub
//!
//! A single file with a `server` and a `registry` section. Every field has
//! a default, so an empty file (or no file) is a valid configuration.

mod registry;
mod server;

pub use registry::RegistryConfig;
pub use server::ServerConfig;

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::ModelStore;

/// modelhub configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelhubConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Model registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl ModelhubConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            _ => Self::from_yaml(path),
        }
    }

    /// Build an empty store configured from the registry section
    pub fn build_store(&self) -> ModelStore {
        ModelStore::new()
            .with_strict_inputs(self.registry.strict_inputs)
            .with_sample_seed(self.registry.sample_seed)
    }
}
