use kermut_core::errors::{KernelError, KernelResult};
use ndarray::Array2;

use crate::constraints::{Constraint, Parameter};
use crate::kernel::{forward_to_child, prefixed, EvalParams, Kernel};

const OUTPUTSCALE: &str = "outputscale";
const BASE_KERNEL: &str = "base_kernel";

/// Multiplies a base kernel by a learnable positive output scale.
#[derive(Debug, Clone)]
pub struct ScaleKernel<K> {
    base: K,
    outputscale: Parameter,
}

impl<K: Kernel> ScaleKernel<K> {
    /// Wrap `base` with the default output scale (raw 0, i.e. ln 2).
    pub fn new(base: K) -> Self {
        Self {
            base,
            outputscale: Parameter::from_raw(OUTPUTSCALE, 0.0, Constraint::Positive),
        }
    }

    pub fn with_outputscale(base: K, outputscale: f64) -> KernelResult<Self> {
        Ok(Self {
            base,
            outputscale: Parameter::new(OUTPUTSCALE, outputscale, Constraint::Positive)?,
        })
    }

    pub fn base(&self) -> &K {
        &self.base
    }

    pub fn outputscale(&self) -> f64 {
        self.outputscale.value()
    }

    pub fn set_outputscale(&mut self, value: f64) -> KernelResult<()> {
        self.outputscale.set_value(value)
    }
}

impl<K: Kernel> Kernel for ScaleKernel<K> {
    type Input = K::Input;

    fn forward(&self, x1: &Self::Input, x2: &Self::Input, params: &EvalParams) -> KernelResult<Array2<f64>> {
        Ok(self.base.forward(x1, x2, params)? * self.outputscale.value())
    }

    fn named_parameters(&self) -> Vec<(String, f64)> {
        let mut params = vec![(OUTPUTSCALE.to_string(), self.outputscale.raw())];
        params.extend(prefixed(BASE_KERNEL, self.base.named_parameters()));
        params
    }

    fn set_raw_parameter(&mut self, name: &str, raw: f64) -> KernelResult<()> {
        if name == OUTPUTSCALE {
            self.outputscale.set_raw(raw);
            return Ok(());
        }
        forward_to_child(BASE_KERNEL, &mut self.base, name, raw).unwrap_or_else(|| {
            Err(KernelError::UnknownParameter {
                name: name.to_string(),
            })
        })
    }
}
