//! HTTP server command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::ModelhubConfig;
use crate::loader;
use crate::server;

/// Start the HTTP server
pub async fn serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    preload: Vec<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(ref path) => ModelhubConfig::from_file(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => ModelhubConfig::default(),
    };

    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }
    config.registry.preload.extend(preload);

    let store = Arc::new(config.build_store());

    for path in &config.registry.preload {
        tracing::info!("Pre-loading model: {}", path.display());
        let bytes = loader::read_model_file(path)?;
        let model = store
            .load(&bytes)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tracing::info!(id = %model.id(), path = %path.display(), "Model loaded successfully");
    }

    server::start(store, config.server).await
}
