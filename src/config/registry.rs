//! Model registry settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject inference requests that omit a declared input instead of
    /// substituting an empty vector
    #[serde(default)]
    pub strict_inputs: bool,

    /// Seed for sample networks (None = random weights every time)
    #[serde(default)]
    pub sample_seed: Option<u64>,

    /// Model files registered when the server starts
    #[serde(default)]
    pub preload: Vec<PathBuf>,
}
