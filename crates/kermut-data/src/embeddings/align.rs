use std::collections::{HashMap, HashSet};

use kermut_core::errors::{DataError, DataResult};
use ndarray::{Array2, Axis};
use tracing::debug;

/// Reorder embedding rows to follow `table_mutants`.
///
/// Rows whose identifier is not in the table are dropped, so row `i` of the
/// result belongs to `table_mutants[i]`. Every table identifier must have a
/// stored row; otherwise the missing identifiers are returned as
/// [`DataError::MissingEmbeddings`]. When the store repeats an identifier
/// the first row wins.
pub fn align_to_table(
    mutants: &[String],
    embeddings: &Array2<f32>,
    table_mutants: &[&str],
) -> DataResult<Array2<f32>> {
    let wanted: HashSet<&str> = table_mutants.iter().copied().collect();

    let mut rows_by_mutant: HashMap<&str, usize> = HashMap::new();
    for (row, mutant) in mutants.iter().enumerate() {
        if wanted.contains(mutant.as_str()) {
            rows_by_mutant.entry(mutant.as_str()).or_insert(row);
        }
    }
    debug!(
        stored = mutants.len(),
        kept = rows_by_mutant.len(),
        "filtered embeddings to table identifiers"
    );

    let mut order = Vec::with_capacity(table_mutants.len());
    let mut missing = Vec::new();
    for mutant in table_mutants {
        match rows_by_mutant.get(mutant) {
            Some(&row) => order.push(row),
            None => missing.push(mutant.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(DataError::MissingEmbeddings { missing });
    }

    Ok(embeddings.select(Axis(0), &order))
}
