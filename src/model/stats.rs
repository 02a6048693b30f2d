//! Parameter distribution summaries

use serde::{Deserialize, Serialize};

const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Summary of one parameter group (`W` or `b`) of one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightStats {
    pub layer: String,
    pub parameter_group: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub num_values: usize,
    pub histogram: Vec<HistogramBin>,
}

/// Describe `values`, or `None` when there is nothing to describe.
pub fn describe(layer: &str, group: &str, values: &[f64]) -> Option<WeightStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut histogram: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            min: min + width * i as f64,
            max: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let bin = if width > 0.0 {
            (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        histogram[bin].count += 1;
    }

    Some(WeightStats {
        layer: layer.to_string(),
        parameter_group: group.to_string(),
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
        num_values: values.len(),
        histogram,
    })
}
