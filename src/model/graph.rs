//! ONNX computation graphs
//!
//! Parsing, optimization and execution are all tract's. This wrapper only
//! records the declared input/output names and feeds single-row tensors.

use std::fmt;
use std::io::Cursor;

use tract_onnx::prelude::*;

use super::LayerSummary;
use crate::error::{InferenceError, NetworkError};

/// Declared graph input
#[derive(Debug, Clone)]
struct GraphInput {
    name: String,
    datum_type: DatumType,
}

/// An optimized, runnable ONNX graph
pub struct GraphNetwork {
    plan: TypedSimplePlan<TypedModel>,
    inputs: Vec<GraphInput>,
    outputs: Vec<String>,
    layers: Vec<LayerSummary>,
}

impl GraphNetwork {
    /// Deserialize and optimize an ONNX model
    pub fn from_onnx(bytes: &[u8]) -> Result<Self, NetworkError> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(bytes))
            .map_err(NetworkError::onnx)?;

        // Names are taken before optimization, which may rename nodes.
        let input_names: Vec<String> = model
            .input_outlets()
            .map_err(NetworkError::onnx)?
            .iter()
            .map(|outlet| model.node(outlet.node).name.clone())
            .collect();
        let outputs: Vec<String> = model
            .output_outlets()
            .map_err(NetworkError::onnx)?
            .iter()
            .map(|outlet| {
                model
                    .outlet_label(*outlet)
                    .map(str::to_string)
                    .unwrap_or_else(|| model.node(outlet.node).name.clone())
            })
            .collect();

        if input_names.is_empty() {
            return Err(NetworkError::NoInputs);
        }
        if outputs.is_empty() {
            return Err(NetworkError::NoOutputs);
        }

        let typed = model.into_optimized().map_err(NetworkError::onnx)?;

        let mut inputs = Vec::with_capacity(input_names.len());
        for (ix, name) in input_names.into_iter().enumerate() {
            let fact = typed.input_fact(ix).map_err(NetworkError::onnx)?;
            inputs.push(GraphInput {
                name,
                datum_type: fact.datum_type,
            });
        }

        let layers = summarize(&typed);
        let plan = typed.into_runnable().map_err(NetworkError::onnx)?;

        Ok(Self {
            plan,
            inputs,
            outputs,
            layers,
        })
    }

    pub fn input_names(&self) -> Vec<String> {
        self.inputs.iter().map(|input| input.name.clone()).collect()
    }

    pub fn output_names(&self) -> &[String] {
        &self.outputs
    }

    /// Operator nodes, excluding sources and constants
    pub fn layers(&self) -> &[LayerSummary] {
        &self.layers
    }

    /// Run the graph with one row per declared input, in declaration order.
    ///
    /// The graph must produce exactly one output.
    pub fn forward(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, InferenceError> {
        let values = self
            .inputs
            .iter()
            .zip(rows)
            .map(|(input, row)| row_value(row, input.datum_type))
            .collect::<TractResult<TVec<TValue>>>()
            .map_err(InferenceError::engine)?;

        let outputs = self.plan.run(values).map_err(InferenceError::engine)?;
        if outputs.len() != 1 {
            return Err(InferenceError::OutputCount(outputs.len()));
        }

        let flat = outputs[0]
            .cast_to::<f64>()
            .map_err(InferenceError::engine)?;
        let values = flat.as_slice::<f64>().map_err(InferenceError::engine)?;
        Ok(values.to_vec())
    }
}

impl fmt::Debug for GraphNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNetwork")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("layers", &self.layers.len())
            .finish()
    }
}

/// `[1, n]` tensor cast to the input's declared type
fn row_value(row: &[f64], datum_type: DatumType) -> TractResult<TValue> {
    let tensor = Tensor::from_shape(&[1, row.len()], row)?;
    Ok(tensor.cast_to_dt(datum_type)?.into_owned().into())
}

fn summarize(model: &TypedModel) -> Vec<LayerSummary> {
    model
        .nodes()
        .iter()
        .filter(|node| !matches!(node.op.name().as_ref(), "Source" | "Const"))
        .map(|node| LayerSummary {
            name: node.name.clone(),
            layer_type: node.op.name().into_owned(),
            inputs: node
                .inputs
                .iter()
                .map(|outlet| model.node(outlet.node).name.clone())
                .collect(),
            n_in: None,
            n_out: None,
            activation: None,
            num_parameters: None,
        })
        .collect()
}
