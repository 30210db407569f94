//! Zero-shot score loading: left merge of a per-method score table onto the
//! mutation table by mutant identifier.

use std::path::Path;

use kermut_core::constants::MUTANT_COL;
use kermut_core::errors::{DataError, DataResult};
use ndarray::Array1;
use tracing::{debug, info};

use crate::table::{parse_float, MutationTable};

/// Read `path` and merge its `score_col` onto `table`.
///
/// A missing score file is `ZeroShotNotFound`.
pub fn load_zero_shot(table: &MutationTable, path: &Path, score_col: &str) -> DataResult<Array1<f32>> {
    if !path.exists() {
        return Err(DataError::ZeroShotNotFound {
            path: path.to_path_buf(),
        });
    }
    let scores = MutationTable::from_path(path)?;
    let merged = merge_scores(table, &scores, score_col)?;

    let matched = merged.iter().filter(|v| !v.is_nan()).count();
    info!(
        path = %path.display(),
        rows = merged.len(),
        matched,
        "merged zero-shot scores"
    );
    Ok(merged)
}

/// Left outer merge on the mutant column.
///
/// The result has one entry per table row, in table order. Rows without a
/// matching score, and empty score cells, are NaN. When the score table
/// repeats an identifier the first occurrence wins.
pub fn merge_scores(table: &MutationTable, scores: &MutationTable, score_col: &str) -> DataResult<Array1<f32>> {
    let values = scores.column(score_col)?;
    let positions = scores.mutant_positions();
    debug!(
        column = score_col,
        score_rows = scores.len(),
        key = MUTANT_COL,
        "merging scores"
    );

    table
        .mutants()
        .into_iter()
        .map(|mutant| match positions.get(mutant) {
            Some(&row) => parse_float(score_col, row, values[row]).map(|v| v as f32),
            None => Ok(f32::NAN),
        })
        .collect::<DataResult<Vec<f32>>>()
        .map(Array1::from)
}
