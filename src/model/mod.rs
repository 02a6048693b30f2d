//! Loaded model handles.
//!
//! A [`LoadedModel`] owns exactly one engine-native network, either an ONNX
//! graph or a sequential dense stack, plus the bookkeeping derived from it.

mod graph;
pub mod sequential;
mod stats;

pub use graph::GraphNetwork;
pub use sequential::{Activation, Layer, LayerKind, Loss, SequentialNetwork};
pub use stats::{HistogramBin, WeightStats};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model discriminant as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelKind {
    /// Directed graph with possibly several named inputs and outputs
    Graph,
    /// Strict chain of layers with one input and one output
    Sequential,
}

/// Engine-native network
#[derive(Debug)]
pub enum Network {
    Graph(GraphNetwork),
    Sequential(SequentialNetwork),
}

impl Network {
    pub fn kind(&self) -> ModelKind {
        match self {
            Network::Graph(_) => ModelKind::Graph,
            Network::Sequential(_) => ModelKind::Sequential,
        }
    }
}

/// Descriptive record of a loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub num_layers: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_parameters: Option<usize>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
}

/// One layer (or graph operator) of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub name: String,
    pub layer_type: String,
    /// Names of the layers feeding this one
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_in: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_out: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_parameters: Option<usize>,
}

/// A registered model
#[derive(Debug)]
pub struct LoadedModel {
    id: String,
    network: Network,
    input_names: Vec<String>,
    output_names: Vec<String>,
    created_at: DateTime<Utc>,
    size_bytes: Option<usize>,
}

impl LoadedModel {
    /// Wrap a network under `id`. `size_bytes` is the size of the source
    /// bytes, if the model came from an upload.
    pub fn new(id: String, network: Network, size_bytes: Option<usize>) -> Self {
        let (input_names, output_names) = match &network {
            Network::Graph(graph) => (graph.input_names(), graph.output_names().to_vec()),
            Network::Sequential(_) => (
                vec![sequential::INPUT_NAME.to_string()],
                vec![sequential::OUTPUT_NAME.to_string()],
            ),
        };

        Self {
            id,
            network,
            input_names,
            output_names,
            created_at: Utc::now(),
            size_bytes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ModelKind {
        self.network.kind()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn num_layers(&self) -> usize {
        match &self.network {
            Network::Graph(graph) => graph.layers().len(),
            Network::Sequential(net) => net.num_layers(),
        }
    }

    pub fn meta(&self) -> ModelMeta {
        ModelMeta {
            id: self.id.clone(),
            kind: self.kind(),
            inputs: self.input_names.clone(),
            outputs: self.output_names.clone(),
            num_layers: self.num_layers(),
            num_parameters: match &self.network {
                Network::Graph(_) => None,
                Network::Sequential(net) => Some(net.num_parameters()),
            },
            created_at: self.created_at,
            size_bytes: self.size_bytes,
        }
    }

    pub fn layers(&self) -> Vec<LayerSummary> {
        match &self.network {
            Network::Graph(graph) => graph.layers().to_vec(),
            Network::Sequential(net) => net.summaries(),
        }
    }

    /// Parameter statistics. Graph weights live inside tract's optimized
    /// operators and are not reported.
    pub fn weight_stats(&self) -> Vec<WeightStats> {
        match &self.network {
            Network::Graph(_) => Vec::new(),
            Network::Sequential(net) => net.weight_stats(),
        }
    }
}
