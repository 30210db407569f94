use kermut_core::errors::{KernelError, KernelResult};
use ndarray::Array2;

use crate::constraints::{Constraint, Parameter};
use crate::kernel::{pairwise, EvalParams, Kernel, Tokens};

const LENGTHSCALE: &str = "lengthscale";

/// Exponential kernel over the Hamming distance between token sequences:
/// `k(a, b) = exp(-d_H(a, b) / ℓ)`.
///
/// Two variants of the same protein differ only at their mutated sites, so
/// `d_H` counts the sites where two mutants disagree.
#[derive(Debug, Clone)]
pub struct HammingKernel {
    lengthscale: Parameter,
}

impl Default for HammingKernel {
    fn default() -> Self {
        Self {
            lengthscale: Parameter::from_raw(LENGTHSCALE, 0.0, Constraint::Positive),
        }
    }
}

impl HammingKernel {
    pub fn new(lengthscale: f64) -> KernelResult<Self> {
        Ok(Self {
            lengthscale: Parameter::new(LENGTHSCALE, lengthscale, Constraint::Positive)?,
        })
    }

    pub fn lengthscale(&self) -> f64 {
        self.lengthscale.value()
    }
}

impl Kernel for HammingKernel {
    type Input = Tokens;

    fn forward(&self, x1: &Tokens, x2: &Tokens, params: &EvalParams) -> KernelResult<Array2<f64>> {
        if x1.ncols() != x2.ncols() {
            return Err(KernelError::ShapeMismatch {
                context: "token sequence length".to_string(),
                left: x1.ncols(),
                right: x2.ncols(),
            });
        }
        let lengthscale = self.lengthscale();
        pairwise(x1.nrows(), x2.nrows(), params, |i, j| {
            let distance = x1
                .row(i)
                .iter()
                .zip(x2.row(j).iter())
                .filter(|(a, b)| a != b)
                .count();
            (-(distance as f64) / lengthscale).exp()
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
