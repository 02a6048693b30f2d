//! Model info command

use std::path::PathBuf;

use anyhow::Result;

use crate::engine::ModelStore;
use crate::loader;
use crate::model::{LoadedModel, ModelKind};

/// Show model information
pub async fn info(model: PathBuf) -> Result<()> {
    let bytes = loader::read_model_file(&model)?;
    let store = ModelStore::new();
    let loaded = store.load(&bytes)?;

    println!("Model: {}\n", model.display());
    print_model(&loaded);

    Ok(())
}

pub(crate) fn print_model(model: &LoadedModel) {
    let meta = model.meta();

    println!(
        "Type: {}",
        match meta.kind {
            ModelKind::Graph => "Graph (ONNX)",
            ModelKind::Sequential => "Sequential",
        }
    );
    println!("Inputs: {}", meta.inputs.join(", "));
    println!("Outputs: {}", meta.outputs.join(", "));
    println!("Layers: {}", meta.num_layers);
    if let Some(params) = meta.num_parameters {
        println!("Parameters: {}", params);
    }
    if let Some(size) = meta.size_bytes {
        let size_kb = size as f64 / 1024.0;
        if size_kb >= 1024.0 {
            println!("Size: {:.2} MB", size_kb / 1024.0);
        } else {
            println!("Size: {:.2} KB", size_kb);
        }
    }

    println!("\nLayers:");
    for layer in model.layers() {
        let mut line = format!("  {} ({})", layer.name, layer.layer_type);
        if let (Some(n_in), Some(n_out)) = (layer.n_in, layer.n_out) {
            line.push_str(&format!(" {} -> {}", n_in, n_out));
        }
        if let Some(activation) = &layer.activation {
            line.push_str(&format!(" [{}]", activation));
        }
        if !layer.inputs.is_empty() {
            line.push_str(&format!(" <- {}", layer.inputs.join(", ")));
        }
        println!("{}", line);
    }
}
