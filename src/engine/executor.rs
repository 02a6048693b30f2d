//! Inference executor
//!
//! Shapes a named-input map into the tensors each engine expects and
//! flattens the single output back into a vector. Batch size is always 1.

use std::collections::HashMap;

use crate::error::InferenceError;
use crate::model::sequential::INPUT_NAME;
use crate::model::{LoadedModel, Network};

/// Inference adapter
///
/// In lenient mode (the default) a declared input missing from the map is
/// replaced by an empty vector, which the engine then rejects as a shape
/// mismatch. Strict mode reports the missing name instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    strict_inputs: bool,
}

impl Executor {
    pub fn new(strict_inputs: bool) -> Self {
        Self { strict_inputs }
    }

    pub fn strict_inputs(&self) -> bool {
        self.strict_inputs
    }

    /// Run a forward pass. Stateless; the model is never mutated.
    pub fn infer(
        &self,
        model: &LoadedModel,
        inputs: &HashMap<String, Vec<f64>>,
    ) -> Result<Vec<f64>, InferenceError> {
        let start = std::time::Instant::now();

        let output = match model.network() {
            Network::Graph(graph) => {
                let rows = model
                    .input_names()
                    .iter()
                    .map(|name| self.resolve(model, inputs, name))
                    .collect::<Result<Vec<_>, _>>()?;
                graph.forward(&rows)?
            }
            Network::Sequential(net) => {
                let row = self.resolve(model, inputs, INPUT_NAME)?;
                net.forward(&row)?
            }
        };

        // Overflow in a dense product surfaces here as NaN or inf
        if output.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::engine("non-finite output"));
        }

        tracing::debug!(
            id = %model.id(),
            outputs = output.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Inference complete"
        );
        Ok(output)
    }

    fn resolve(
        &self,
        model: &LoadedModel,
        inputs: &HashMap<String, Vec<f64>>,
        name: &str,
    ) -> Result<Vec<f64>, InferenceError> {
        match inputs.get(name) {
            Some(values) => Ok(values.clone()),
            None if self.strict_inputs => Err(InferenceError::MissingInput(name.to_string())),
            None => {
                tracing::warn!(
                    id = %model.id(),
                    input = %name,
                    "Input missing from request, substituting an empty vector"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activation, Layer, Loss, SequentialNetwork};
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn sample_model() -> LoadedModel {
        let net = SequentialNetwork::sample(&mut Xoshiro256PlusPlus::seed_from_u64(5));
        LoadedModel::new("sample".to_string(), Network::Sequential(net), None)
    }

    fn input(values: Vec<f64>) -> HashMap<String, Vec<f64>> {
        let mut map = HashMap::new();
        map.insert("input".to_string(), values);
        map
    }

    #[test]
    fn test_sample_softmax_sums_to_one() {
        let model = sample_model();
        let exec = Executor::default();
        for values in [
            vec![1.0, 2.0, 3.0, 4.0],
            vec![-10.0, 0.0, 10.0, 0.5],
            vec![0.0; 4],
        ] {
            let out = exec.infer(&model, &input(values)).unwrap();
            assert_eq!(out.len(), 3);
            assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extra_inputs_are_ignored() {
        let model = sample_model();
        let mut inputs = input(vec![1.0, 2.0, 3.0, 4.0]);
        inputs.insert("branchA".to_string(), vec![9.0]);
        assert_eq!(Executor::default().infer(&model, &inputs).unwrap().len(), 3);
    }

    #[test]
    fn test_lenient_missing_input_is_engine_error() {
        let model = sample_model();
        let err = Executor::default()
            .infer(&model, &HashMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ShapeMismatch {
                expected: 4,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_strict_missing_input() {
        let model = sample_model();
        let err = Executor::new(true)
            .infer(&model, &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, InferenceError::MissingInput(ref n) if n == "input"));
    }

    #[test]
    fn test_overflowing_input_is_rejected() {
        // x . W overflows to [inf, inf]; softmax then yields NaN
        let net = SequentialNetwork::new(vec![Layer::output(
            "out",
            array![[1.0, 1.0], [1.0, 1.0]],
            Activation::Softmax,
            Loss::NegativeLogLikelihood,
        )])
        .unwrap();
        let model = LoadedModel::new("overflow".to_string(), Network::Sequential(net), None);
        let err = Executor::default()
            .infer(&model, &input(vec![1e308, 1e308]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::Engine(ref msg) if msg.contains("non-finite")));
    }

    #[test]
    fn test_sample_rejects_or_normalizes_extreme_input() {
        let model = sample_model();
        match Executor::default().infer(&model, &input(vec![1e308, -1e308, 1e308, 1e308])) {
            Ok(out) => assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9),
            Err(err) => assert!(matches!(err, InferenceError::Engine(_))),
        }
    }

    #[test]
    fn test_wrong_width_is_shape_mismatch() {
        let model = sample_model();
        let err = Executor::default()
            .infer(&model, &input(vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { actual: 2, .. }));
    }
}
