use kermut_core::errors::{DataError, DataResult};
use ndarray::{Array2, ArrayD, Axis, Ix2, Ix3};

/// Reduce per-token embeddings `(n, length, dim)` to `(n, dim)` by
/// averaging over the token axis. Rank-2 input is already pooled and is
/// returned unchanged. A zero-length token axis yields NaN rows.
pub fn mean_pool(embeddings: ArrayD<f32>) -> DataResult<Array2<f32>> {
    match embeddings.ndim() {
        2 => embeddings
            .into_dimensionality::<Ix2>()
            .map_err(|_| DataError::UnsupportedRank { rank: 2 }),
        3 => {
            let per_token = embeddings
                .into_dimensionality::<Ix3>()
                .map_err(|_| DataError::UnsupportedRank { rank: 3 })?;
            let (n, _, dim) = per_token.dim();
            Ok(per_token
                .mean_axis(Axis(1))
                .unwrap_or_else(|| Array2::from_elem((n, dim), f32::NAN)))
        }
        rank => Err(DataError::UnsupportedRank { rank }),
    }
}
