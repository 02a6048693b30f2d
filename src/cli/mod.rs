//! CLI commands

mod info;
mod run;
mod sample;
mod serve;

pub use info::info;
pub use run::{parse_input, run};
pub use sample::sample;
pub use serve::serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// modelhub - model registry and inference server
#[derive(Parser)]
#[command(name = "modelhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file (YAML or JSON)
        #[arg(long, short, env = "MODELHUB_CONFIG")]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Model files to register before accepting requests
        #[arg(long)]
        preload: Vec<PathBuf>,
    },

    /// Show model metadata and layers
    Info {
        /// Path to an ONNX model or sequential network document
        model: PathBuf,
    },

    /// Run a single inference
    Run {
        /// Path to an ONNX model or sequential network document
        model: PathBuf,

        /// Named input as name=v1,v2,... (repeatable)
        #[arg(long, short, value_parser = parse_input)]
        input: Vec<(String, Vec<f64>)>,

        /// Fail on missing inputs instead of substituting an empty vector
        #[arg(long)]
        strict: bool,
    },

    /// Create the untrained sample network
    Sample {
        /// Seed for the weight initialization
        #[arg(long)]
        seed: Option<u64>,

        /// Write the network document to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
