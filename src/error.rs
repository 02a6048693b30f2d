//! Error taxonomy for loading, lookup and inference

use thiserror::Error;

/// Why a byte stream could not be turned into a network
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("ONNX: {0}")]
    Onnx(String),

    #[error("graph declares no inputs")]
    NoInputs,

    #[error("graph declares no outputs")]
    NoOutputs,

    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("network has no layers")]
    Empty,

    #[error("layer {layer}: bias has {bias} entries but weights have {columns} columns")]
    BiasMismatch {
        layer: String,
        bias: usize,
        columns: usize,
    },

    #[error("layer {layer}: expects {n_in} inputs but the previous layer produces {previous}")]
    Disconnected {
        layer: String,
        n_in: usize,
        previous: usize,
    },
}

impl NetworkError {
    pub(crate) fn onnx(err: impl std::fmt::Display) -> Self {
        Self::Onnx(format!("{:#}", err))
    }
}

/// Both deserialization strategies failed
#[derive(Error, Debug)]
#[error("not a graph model ({graph}) and not a sequential model ({sequential})")]
pub struct LoadError {
    pub graph: NetworkError,
    pub sequential: NetworkError,
}

/// Failure while evaluating a model
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("layer {layer}: expected {expected} input values, got {actual}")]
    ShapeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected a single output, model produced {0}")]
    OutputCount(usize),

    #[error("engine error: {0}")]
    Engine(String),
}

impl InferenceError {
    pub(crate) fn engine(err: impl std::fmt::Display) -> Self {
        Self::Engine(format!("{:#}", err))
    }
}

/// Errors surfaced by the model store
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("model not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
