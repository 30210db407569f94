//! JSON summaries printed by the CLI.

use kermut_core::CompositionMode;
use kermut_data::PreprocessedData;
use ndarray::Array2;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub dms_id: String,
    pub rows: usize,
    pub tokens: Option<[usize; 2]>,
    pub embeddings: Option<[usize; 2]>,
    pub zero_shot_rows: Option<usize>,
    pub zero_shot_missing: Option<usize>,
}

impl DatasetSummary {
    pub fn new(dms_id: &str, data: &PreprocessedData) -> Self {
        Self {
            dms_id: dms_id.to_string(),
            rows: data.table.len(),
            tokens: data.tokens.as_ref().map(|t| [t.nrows(), t.ncols()]),
            embeddings: data.embeddings.as_ref().map(|e| [e.nrows(), e.ncols()]),
            zero_shot_rows: data.zero_shot.as_ref().map(|z| z.len()),
            zero_shot_missing: data
                .zero_shot
                .as_ref()
                .map(|z| z.iter().filter(|v| v.is_nan()).count()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CovarianceSummary {
    pub dms_id: String,
    pub composition: String,
    pub shape: [usize; 2],
    pub trace: f64,
    pub max_asymmetry: f64,
}

impl CovarianceSummary {
    pub fn new(dms_id: &str, composition: CompositionMode, cov: &Array2<f64>) -> Self {
        let max_asymmetry = cov
            .indexed_iter()
            .map(|((i, j), v)| (v - cov[[j, i]]).abs())
            .fold(0.0, f64::max);
        Self {
            dms_id: dms_id.to_string(),
            composition: composition.to_string(),
            shape: [cov.nrows(), cov.ncols()],
            trace: cov.diag().sum(),
            max_asymmetry,
        }
    }
}
