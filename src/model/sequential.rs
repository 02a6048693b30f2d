//! Sequential dense networks
//!
//! A strict chain of fully-connected layers with one input and one output,
//! evaluated with ndarray matrix products. Networks travel as JSON documents:
//!
//! ```json
//! { "layers": [
//!     { "type": "dense", "activation": "relu",
//!       "weights": { "v": 1, "dim": [4, 3], "data": [...] },
//!       "bias": { "v": 1, "dim": [3], "data": [...] } },
//!     { "type": "output", "activation": "softmax", "loss": "negative_log_likelihood", ... }
//! ] }
//! ```

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::stats::{describe, WeightStats};
use super::LayerSummary;
use crate::error::{InferenceError, NetworkError};

/// Name of the single input of every sequential network
pub const INPUT_NAME: &str = "input";
/// Name of the single output of every sequential network
pub const OUTPUT_NAME: &str = "output";

/// Activation applied after a layer's affine transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Softmax => "softmax",
        }
    }

    fn apply(self, z: Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Identity => z,
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Sigmoid => z.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Tanh => z.mapv(f64::tanh),
            Activation::Softmax => {
                let mut result = z;
                for mut row in result.rows_mut() {
                    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    let exp_sum: f64 = row.iter().map(|&v| (v - max).exp()).sum();
                    row.mapv_inplace(|v| (v - max).exp() / exp_sum);
                }
                result
            }
        }
    }
}

/// Training loss recorded on output layers. Never evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    NegativeLogLikelihood,
    Mcxent,
    Mse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Dense,
    Output,
}

/// Fully-connected layer: `activation(x . weights + bias)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Defaults to `layer{index}` when empty
    #[serde(default)]
    pub name: String,
    pub activation: Activation,
    /// Shape `(n_in, n_out)`
    pub weights: Array2<f64>,
    /// Length `n_out`
    pub bias: Array1<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<Loss>,
}

impl Layer {
    pub fn dense(name: impl Into<String>, weights: Array2<f64>, activation: Activation) -> Self {
        let bias = Array1::zeros(weights.ncols());
        Self {
            kind: LayerKind::Dense,
            name: name.into(),
            activation,
            weights,
            bias,
            loss: None,
        }
    }

    pub fn output(
        name: impl Into<String>,
        weights: Array2<f64>,
        activation: Activation,
        loss: Loss,
    ) -> Self {
        Self {
            kind: LayerKind::Output,
            loss: Some(loss),
            ..Self::dense(name, weights, activation)
        }
    }

    pub fn n_in(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_out(&self) -> usize {
        self.weights.ncols()
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.bias.len()
    }

    fn layer_type(&self) -> &'static str {
        match self.kind {
            LayerKind::Dense => "DenseLayer",
            LayerKind::Output => "OutputLayer",
        }
    }
}

/// A validated chain of layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialNetwork {
    layers: Vec<Layer>,
}

impl SequentialNetwork {
    /// Validate the chain and fill in default layer names.
    pub fn new(mut layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::Empty);
        }

        let mut previous: Option<usize> = None;
        for (index, layer) in layers.iter_mut().enumerate() {
            if layer.name.is_empty() {
                layer.name = format!("layer{}", index);
            }
            if layer.bias.len() != layer.n_out() {
                return Err(NetworkError::BiasMismatch {
                    layer: layer.name.clone(),
                    bias: layer.bias.len(),
                    columns: layer.n_out(),
                });
            }
            if let Some(previous) = previous {
                if layer.n_in() != previous {
                    return Err(NetworkError::Disconnected {
                        layer: layer.name.clone(),
                        n_in: layer.n_in(),
                        previous,
                    });
                }
            }
            previous = Some(layer.n_out());
        }

        Ok(Self { layers })
    }

    /// Parse and validate a JSON network document
    pub fn from_json(bytes: &[u8]) -> Result<Self, NetworkError> {
        let raw: SequentialNetwork = serde_json::from_slice(bytes)?;
        Self::new(raw.layers)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Untrained 4 -> 3 (ReLU) -> 3 (softmax) classifier.
    ///
    /// Weights are Xavier-uniform, biases zero. Only meant for exercising the
    /// API surface; outputs carry no meaning beyond being a distribution.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let hidden = Layer::dense("layer0", xavier(rng, 4, 3), Activation::Relu);
        let output = Layer::output(
            "layer1",
            xavier(rng, 3, 3),
            Activation::Softmax,
            Loss::NegativeLogLikelihood,
        );
        Self {
            layers: vec![hidden, output],
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(Layer::num_parameters).sum()
    }

    /// Forward pass on a single row.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let mut x = Array2::from_shape_vec((1, input.len()), input.to_vec())
            .map_err(InferenceError::engine)?;

        for layer in &self.layers {
            if x.ncols() != layer.n_in() {
                return Err(InferenceError::ShapeMismatch {
                    layer: layer.name.clone(),
                    expected: layer.n_in(),
                    actual: x.ncols(),
                });
            }
            let z = x.dot(&layer.weights) + &layer.bias;
            x = layer.activation.apply(z);
        }

        Ok(x.iter().copied().collect())
    }

    pub fn summaries(&self) -> Vec<LayerSummary> {
        self.layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerSummary {
                name: layer.name.clone(),
                layer_type: layer.layer_type().to_string(),
                inputs: match index {
                    0 => vec![INPUT_NAME.to_string()],
                    _ => vec![self.layers[index - 1].name.clone()],
                },
                n_in: Some(layer.n_in()),
                n_out: Some(layer.n_out()),
                activation: Some(layer.activation.name().to_string()),
                num_parameters: Some(layer.num_parameters()),
            })
            .collect()
    }

    pub fn weight_stats(&self) -> Vec<WeightStats> {
        self.layers
            .iter()
            .flat_map(|layer| {
                let weights: Vec<f64> = layer.weights.iter().copied().collect();
                let bias: Vec<f64> = layer.bias.iter().copied().collect();
                [
                    describe(&layer.name, "W", &weights),
                    describe(&layer.name, "b", &bias),
                ]
            })
            .flatten()
            .collect()
    }
}

fn xavier<R: Rng + ?Sized>(rng: &mut R, n_in: usize, n_out: usize) -> Array2<f64> {
    let scale = (6.0 / (n_in + n_out) as f64).sqrt();
    Array2::from_shape_fn((n_in, n_out), |_| rng.gen_range(-scale..scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn sample() -> SequentialNetwork {
        SequentialNetwork::sample(&mut Xoshiro256PlusPlus::seed_from_u64(42))
    }

    #[test]
    fn test_sample_shape() {
        let net = sample();
        assert_eq!(net.num_layers(), 2);
        assert_eq!(net.layers()[0].n_in(), 4);
        assert_eq!(net.layers()[0].n_out(), 3);
        assert_eq!(net.layers()[1].n_out(), 3);
        assert_eq!(net.layers()[1].loss, Some(Loss::NegativeLogLikelihood));
        assert_eq!(net.num_parameters(), 4 * 3 + 3 + 3 * 3 + 3);
    }

    #[test]
    fn test_sample_output_is_distribution() {
        let net = sample();
        for input in [
            [0.0, 0.0, 0.0, 0.0],
            [1.0, -2.0, 3.5, 0.25],
            [100.0, 250.0, -75.0, 12.0],
        ] {
            let out = net.forward(&input).unwrap();
            assert_eq!(out.len(), 3);
            let sum: f64 = out.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
            assert!(out.iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn test_forward_known_weights() {
        let net = SequentialNetwork::new(vec![Layer {
            bias: array![0.5, -1.0],
            ..Layer::dense("affine", array![[1.0, 2.0], [3.0, 4.0]], Activation::Relu)
        }])
        .unwrap();
        // [1, 1] . W = [4, 6]; + b = [4.5, 5.0]
        assert_eq!(net.forward(&[1.0, 1.0]).unwrap(), vec![4.5, 5.0]);
        // [-1, 0] . W = [-1, -2]; + b = [-0.5, -3.0]; relu -> 0
        assert_eq!(net.forward(&[-1.0, 0.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_forward_shape_mismatch() {
        let net = sample();
        match net.forward(&[]) {
            Err(InferenceError::ShapeMismatch {
                layer,
                expected,
                actual,
            }) => {
                assert_eq!(layer, "layer0");
                assert_eq!(expected, 4);
                assert_eq!(actual, 0);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_document_roundtrip_preserves_outputs() {
        let net = sample();
        let bytes = net.to_json().unwrap();
        let parsed = SequentialNetwork::from_json(&bytes).unwrap();
        let input = [0.3, -0.1, 2.0, 1.0];
        assert_eq!(net.forward(&input).unwrap(), parsed.forward(&input).unwrap());
    }

    #[test]
    fn test_default_layer_names() {
        let doc = r#"{
            "layers": [
                { "type": "dense", "activation": "tanh",
                  "weights": { "v": 1, "dim": [2, 2], "data": [1, 0, 0, 1] },
                  "bias": { "v": 1, "dim": [2], "data": [0, 0] } },
                { "type": "output", "activation": "identity", "loss": "mse",
                  "weights": { "v": 1, "dim": [2, 1], "data": [1, 1] },
                  "bias": { "v": 1, "dim": [1], "data": [0] } }
            ]
        }"#;
        let net = SequentialNetwork::from_json(doc.as_bytes()).unwrap();
        let names: Vec<&str> = net.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["layer0", "layer1"]);
        let summaries = net.summaries();
        assert_eq!(summaries[1].inputs, vec!["layer0".to_string()]);
        assert_eq!(summaries[1].layer_type, "OutputLayer");
    }

    #[test]
    fn test_rejects_invalid_documents() {
        assert!(matches!(
            SequentialNetwork::from_json(br#"{ "layers": [] }"#),
            Err(NetworkError::Empty)
        ));
        assert!(matches!(
            SequentialNetwork::from_json(b"not json"),
            Err(NetworkError::Document(_))
        ));

        let disconnected = SequentialNetwork::new(vec![
            Layer::dense("a", Array2::zeros((4, 3)), Activation::Relu),
            Layer::dense("b", Array2::zeros((2, 3)), Activation::Relu),
        ]);
        assert!(matches!(
            disconnected,
            Err(NetworkError::Disconnected { n_in: 2, previous: 3, .. })
        ));

        let bad_bias = SequentialNetwork::new(vec![Layer {
            bias: Array1::zeros(5),
            ..Layer::dense("a", Array2::zeros((4, 3)), Activation::Relu)
        }]);
        assert!(matches!(
            bad_bias,
            Err(NetworkError::BiasMismatch { bias: 5, columns: 3, .. })
        ));
    }

    #[test]
    fn test_weight_stats_cover_every_group() {
        let stats = sample().weight_stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].parameter_group, "W");
        assert_eq!(stats[0].num_values, 12);
        assert_eq!(stats[1].parameter_group, "b");
        assert_eq!(stats[1].min, 0.0);
        assert_eq!(stats[1].max, 0.0);
    }
}
