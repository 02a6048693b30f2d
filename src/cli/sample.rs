//! Sample network command

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::info::print_model;
use crate::engine::ModelStore;
use crate::model::Network;

/// Build the sample network, print it and optionally save its document
pub async fn sample(seed: Option<u64>, output: Option<PathBuf>) -> Result<()> {
    let store = ModelStore::new().with_sample_seed(seed);
    let model = store.create_sample();

    print_model(&model);

    if let Some(path) = output {
        if let Network::Sequential(net) = model.network() {
            std::fs::write(&path, net.to_json()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("\nSaved to {}", path.display());
        }
    }

    Ok(())
}
