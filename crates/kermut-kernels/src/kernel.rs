//! The kernel contract and its input types.

use kermut_core::errors::{KernelError, KernelResult};
use ndarray::Array2;

/// Token indices, one row per sequence.
pub type Tokens = Array2<usize>;

/// Pooled embeddings, one row per sequence.
pub type Embeddings = Array2<f32>;

/// Evaluation options forwarded unchanged through every wrapper and
/// composition to the leaf kernels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalParams {
    /// Return only `k(x1[i], x2[i])` as an `(n, 1)` column. Requires
    /// `x1` and `x2` of equal length.
    pub diag: bool,
}

/// A covariance function over one kind of input.
pub trait Kernel: Send + Sync {
    type Input;

    /// Covariance between the rows of `x1` and `x2`: shape `(n1, n2)`, or
    /// `(n, 1)` with `params.diag`.
    fn forward(&self, x1: &Self::Input, x2: &Self::Input, params: &EvalParams) -> KernelResult<Array2<f64>>;

    /// Raw (unconstrained) values of every learnable parameter, by name.
    fn named_parameters(&self) -> Vec<(String, f64)> {
        Vec::new()
    }

    /// Overwrite one raw parameter value by name.
    fn set_raw_parameter(&mut self, name: &str, _raw: f64) -> KernelResult<()> {
        Err(KernelError::UnknownParameter {
            name: name.to_string(),
        })
    }
}

/// One batch of composite-kernel inputs. Both halves describe the same
/// sequences, row for row.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelInput {
    pub tokens: Tokens,
    pub embeddings: Embeddings,
}

impl KernelInput {
    pub fn new(tokens: Tokens, embeddings: Embeddings) -> KernelResult<Self> {
        if tokens.nrows() != embeddings.nrows() {
            return Err(KernelError::ShapeMismatch {
                context: "kernel input rows (tokens vs embeddings)".to_string(),
                left: tokens.nrows(),
                right: embeddings.nrows(),
            });
        }
        Ok(Self { tokens, embeddings })
    }

    pub fn len(&self) -> usize {
        self.tokens.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared `diag` precondition for leaf kernels.
pub(crate) fn check_diag(n1: usize, n2: usize, params: &EvalParams) -> KernelResult<()> {
    if params.diag && n1 != n2 {
        return Err(KernelError::ShapeMismatch {
            context: "diagonal evaluation rows".to_string(),
            left: n1,
            right: n2,
        });
    }
    Ok(())
}

/// Build a full `(n1, n2)` matrix or its `(n, 1)` diagonal from a
/// pairwise function.
pub(crate) fn pairwise(
    n1: usize,
    n2: usize,
    params: &EvalParams,
    k: impl Fn(usize, usize) -> f64,
) -> KernelResult<Array2<f64>> {
    check_diag(n1, n2, params)?;
    if params.diag {
        Ok(Array2::from_shape_fn((n1, 1), |(i, _)| k(i, i)))
    } else {
        Ok(Array2::from_shape_fn((n1, n2), |(i, j)| k(i, j)))
    }
}

/// Qualify child parameter names with `prefix.`.
pub(crate) fn prefixed(prefix: &str, params: Vec<(String, f64)>) -> Vec<(String, f64)> {
    params
        .into_iter()
        .map(|(name, raw)| (format!("{prefix}.{name}"), raw))
        .collect()
}

/// Forward `name` to a child kernel when it starts with `prefix.`.
/// Returns `None` when the name belongs elsewhere.
pub(crate) fn forward_to_child<K: Kernel + ?Sized>(
    prefix: &str,
    child: &mut K,
    name: &str,
    raw: f64,
) -> Option<KernelResult<()>> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('.')?;
    Some(child.set_raw_parameter(rest, raw).map_err(|e| match e {
        KernelError::UnknownParameter { .. } => KernelError::UnknownParameter {
            name: name.to_string(),
        },
        other => other,
    }))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn input_requires_matching_rows() {
        let tokens = array![[0usize, 1], [1, 0]];
        let embeddings = array![[0.0f32, 1.0]];
        assert!(matches!(
            KernelInput::new(tokens, embeddings),
            Err(KernelError::ShapeMismatch { left: 2, right: 1, .. })
        ));
    }

    #[test]
    fn pairwise_full_and_diag() {
        let full = pairwise(2, 3, &EvalParams::default(), |i, j| (i * 10 + j) as f64).unwrap();
        assert_eq!(full, array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]]);

        let diag = pairwise(2, 2, &EvalParams { diag: true }, |i, j| (i * 10 + j) as f64).unwrap();
        assert_eq!(diag, array![[0.0], [11.0]]);
    }

    #[test]
    fn diag_requires_equal_lengths() {
        assert!(pairwise(2, 3, &EvalParams { diag: true }, |_, _| 0.0).is_err());
    }
}
