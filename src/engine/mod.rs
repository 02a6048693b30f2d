//! Model registry and inference
//!
//! - ModelStore: registers, looks up and removes loaded models
//! - Executor: runs a forward pass on a loaded model

mod executor;
mod store;

pub use crate::error::{InferenceError, LoadError, RegistryError};
pub use executor::Executor;
pub use store::ModelStore;
