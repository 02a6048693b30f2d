//! One-shot inference command

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::engine::ModelStore;
use crate::loader;

/// Load a model and run a single inference
pub async fn run(model: PathBuf, inputs: Vec<(String, Vec<f64>)>, strict: bool) -> Result<()> {
    let bytes = loader::read_model_file(&model)?;
    let store = ModelStore::new().with_strict_inputs(strict);

    tracing::info!("Loading model: {}", model.display());
    let loaded = store.load(&bytes)?;

    let inputs: HashMap<String, Vec<f64>> = inputs.into_iter().collect();
    let output = store.executor().infer(&loaded, &inputs)?;

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// Parse `name=v1,v2,...` into a named input vector
pub fn parse_input(arg: &str) -> std::result::Result<(String, Vec<f64>), String> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=v1,v2,..., got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing input name in '{}'", arg));
    }

    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .map_err(|e| format!("invalid value '{}' for input '{}': {}", v, name, e))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((name.to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(
            parse_input("input=1,2.5, -3").unwrap(),
            ("input".to_string(), vec![1.0, 2.5, -3.0])
        );
        assert_eq!(parse_input("a=").unwrap(), ("a".to_string(), vec![]));
    }

    #[test]
    fn test_parse_input_errors() {
        assert!(parse_input("1,2,3").is_err());
        assert!(parse_input("=1,2").is_err());
        assert!(parse_input("x=1,two").is_err());
    }
}
