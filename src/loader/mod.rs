//! Model loading
//!
//! Byte streams are tried as an ONNX graph first and as a sequential
//! network document second. All parsing is done by tract and serde_json.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::LoadError;
use crate::model::{GraphNetwork, Network, SequentialNetwork};

/// Deserialize `bytes` as a graph model, falling back to a sequential one.
pub fn load_network(bytes: &[u8]) -> std::result::Result<Network, LoadError> {
    let graph = match GraphNetwork::from_onnx(bytes) {
        Ok(graph) => return Ok(Network::Graph(graph)),
        Err(e) => e,
    };
    tracing::debug!(error = %graph, "Not a graph model, trying sequential");

    match SequentialNetwork::from_json(bytes) {
        Ok(net) => Ok(Network::Sequential(net)),
        Err(sequential) => Err(LoadError { graph, sequential }),
    }
}

/// Read a model file from disk
pub fn read_model_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).with_context(|| format!("Failed to read model file: {}", path.display()))
}
