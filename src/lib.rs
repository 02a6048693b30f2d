//! modelhub - model registry and inference server
//!
//! modelhub keeps pre-trained neural networks in memory under generated ids
//! and serves metadata and inference over HTTP.
//!
//! # Architecture
//!
//! modelhub is bookkeeping around external engines:
//! - **tract**: ONNX parsing, graph optimization and execution
//! - **ndarray**: forward pass of sequential dense networks
//! - **modelhub**: model store, input shaping, HTTP server, CLI
//!
//! # Supported Formats
//!
//! - ONNX (graph-structured, any number of named inputs, one output)
//! - Sequential network documents (JSON dense layer stacks)
//!
//! # Example
//!
//! ```bash
//! # Start server with a model registered up front
//! modelhub serve --port 8080 --preload ./models/iris.onnx
//!
//! # Inspect a model file
//! modelhub info ./models/iris.onnx
//!
//! # One-shot inference
//! modelhub run ./models/sample.json --input input=5.1,3.5,1.4,0.2
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod server;

// Re-export key types
pub use config::{ModelhubConfig, RegistryConfig, ServerConfig};
pub use engine::{Executor, ModelStore};
pub use error::{InferenceError, LoadError, RegistryError};
pub use loader::load_network;
pub use model::{LoadedModel, ModelKind, ModelMeta, Network};
