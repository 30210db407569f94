use kermut_core::errors::{KernelError, KernelResult};
use ndarray::Array2;

use crate::constraints::{Constraint, Parameter};
use crate::kernel::{pairwise, EvalParams, Kernel, Embeddings};

const LENGTHSCALE: &str = "lengthscale";

/// Squared-exponential kernel over embeddings:
/// `k(a, b) = exp(-‖a − b‖² / (2ℓ²))`.
#[derive(Debug, Clone)]
pub struct RbfKernel {
    lengthscale: Parameter,
}

impl Default for RbfKernel {
    /// Lengthscale from a zero raw value (ln 2).
    fn default() -> Self {
        Self {
            lengthscale: Parameter::from_raw(LENGTHSCALE, 0.0, Constraint::Positive),
        }
    }
}

impl RbfKernel {
    pub fn new(lengthscale: f64) -> KernelResult<Self> {
        Ok(Self {
            lengthscale: Parameter::new(LENGTHSCALE, lengthscale, Constraint::Positive)?,
        })
    }

    pub fn lengthscale(&self) -> f64 {
        self.lengthscale.value()
    }
}

impl Kernel for RbfKernel {
    type Input = Embeddings;

    fn forward(&self, x1: &Embeddings, x2: &Embeddings, params: &EvalParams) -> KernelResult<Array2<f64>> {
        if x1.ncols() != x2.ncols() {
            return Err(KernelError::ShapeMismatch {
                context: "embedding dimension".to_string(),
                left: x1.ncols(),
                right: x2.ncols(),
            });
        }
        let scale = 2.0 * self.lengthscale().powi(2);
        pairwise(x1.nrows(), x2.nrows(), params, |i, j| {
            let sq_dist: f64 = x1
                .row(i)
                .iter()
                .zip(x2.row(j).iter())
                .map(|(&a, &b)| {
                    let d = f64::from(a) - f64::from(b);
                    d * d
                })
                .sum();
            (-sq_dist / scale).exp()
        })
    }

    fn named_parameters(&self) -> Vec<(String, f64)> {
        vec![(LENGTHSCALE.to_string(), self.lengthscale.raw())]
    }

    fn set_raw_parameter(&mut self, name: &str, raw: f64) -> KernelResult<()> {
        if name != LENGTHSCALE {
            return Err(KernelError::UnknownParameter {
                name: name.to_string(),
            });
        }
        self.lengthscale.set_raw(raw);
        Ok(())
    }
}
