//! Composite kernel: one covariance function over (tokens, embedding)
//! pairs built from a structure kernel and a sequence kernel.

use kermut_core::config::CompositionMode;
use kermut_core::errors::{KernelError, KernelResult};
use ndarray::Array2;
use tracing::debug;

use crate::constraints::{Constraint, Parameter};
use crate::kernel::{forward_to_child, prefixed, EvalParams, Kernel, KernelInput, Embeddings, Tokens};
use crate::scale::ScaleKernel;

const PI: &str = "pi";
const OUTPUTSCALE: &str = "scale_kernel.outputscale";
const STRUCTURE: &str = "structure_kernel";
const SEQUENCE: &str = "sequence_kernel";

/// Mixing weight domain for `WeightedSum`.
const UNIT_INTERVAL: Constraint = Constraint::Interval {
    lower: 0.0,
    upper: 1.0,
};

/// A composition strategy together with the sub-kernels and parameters it
/// owns.
#[derive(Debug, Clone)]
pub enum Composition<S, Q> {
    /// `π · scale·S + (1 − π) · Q`
    WeightedSum {
        structure: ScaleKernel<S>,
        sequence: Q,
        pi: Parameter,
    },
    /// `scale₁·S + scale₂·Q`
    Add {
        structure: ScaleKernel<S>,
        sequence: ScaleKernel<Q>,
    },
    /// `scale · (S ⊙ Q)`
    Multiply {
        structure: S,
        sequence: Q,
        outputscale: Parameter,
    },
}

/// Combines a structure kernel over tokens with a sequence kernel over
/// embeddings.
///
/// Self-covariance (`x2 = None`) is symmetric positive semi-definite
/// whenever both sub-kernels are.
#[derive(Debug, Clone)]
pub struct CompositeKernel<S, Q> {
    composition: Composition<S, Q>,
}

impl<S, Q> CompositeKernel<S, Q>
where
    S: Kernel<Input = Tokens>,
    Q: Kernel<Input = Embeddings>,
{
    /// Wrap the sub-kernels as `mode` requires.
    pub fn new(structure: S, sequence: Q, mode: CompositionMode) -> Self {
        let composition = match mode {
            CompositionMode::WeightedSum => Composition::WeightedSum {
                structure: ScaleKernel::new(structure),
                sequence,
                // Raw 0 is the interval midpoint, π = 0.5.
                pi: Parameter::from_raw(PI, 0.0, UNIT_INTERVAL),
            },
            CompositionMode::Add => Composition::Add {
                structure: ScaleKernel::new(structure),
                sequence: ScaleKernel::new(sequence),
            },
            CompositionMode::Multiply => Composition::Multiply {
                structure,
                sequence,
                outputscale: Parameter::from_raw(OUTPUTSCALE, 0.0, Constraint::Positive),
            },
        };
        debug!(composition = %mode, "composite kernel constructed");
        Self { composition }
    }

    /// Like [`CompositeKernel::new`], with the mode given by name.
    /// Unknown names are rejected.
    pub fn from_name(structure: S, sequence: Q, composition: &str) -> KernelResult<Self> {
        let mode = composition.parse::<CompositionMode>()?;
        Ok(Self::new(structure, sequence, mode))
    }

    pub fn composition(&self) -> &Composition<S, Q> {
        &self.composition
    }

    pub fn mode(&self) -> CompositionMode {
        match self.composition {
            Composition::WeightedSum { .. } => CompositionMode::WeightedSum,
            Composition::Add { .. } => CompositionMode::Add,
            Composition::Multiply { .. } => CompositionMode::Multiply,
        }
    }

    /// Mixing weight, for `WeightedSum` only.
    pub fn pi(&self) -> Option<f64> {
        match &self.composition {
            Composition::WeightedSum { pi, .. } => Some(pi.value()),
            _ => None,
        }
    }

    /// Set the mixing weight. Errors for other compositions and for values
    /// outside `[0, 1]`.
    pub fn set_pi(&mut self, value: f64) -> KernelResult<()> {
        match &mut self.composition {
            Composition::WeightedSum { pi, .. } => pi.set_value(value),
            _ => Err(KernelError::UnknownParameter {
                name: PI.to_string(),
            }),
        }
    }

    /// Set the output scale of the structure sub-kernel (`WeightedSum`,
    /// `Add` only).
    pub fn set_structure_outputscale(&mut self, value: f64) -> KernelResult<()> {
        match &mut self.composition {
            Composition::WeightedSum { structure, .. } | Composition::Add { structure, .. } => {
                structure.set_outputscale(value)
            }
            Composition::Multiply { .. } => Err(KernelError::UnknownParameter {
                name: format!("{STRUCTURE}.outputscale"),
            }),
        }
    }

    /// Set the output scale of the sequence sub-kernel (`Add` only).
    pub fn set_sequence_outputscale(&mut self, value: f64) -> KernelResult<()> {
        match &mut self.composition {
            Composition::Add { sequence, .. } => sequence.set_outputscale(value),
            _ => Err(KernelError::UnknownParameter {
                name: format!("{SEQUENCE}.outputscale"),
            }),
        }
    }

    /// Shared scale on the product (`Multiply` only).
    pub fn outputscale(&self) -> Option<f64> {
        match &self.composition {
            Composition::Multiply { outputscale, .. } => Some(outputscale.value()),
            _ => None,
        }
    }

    /// Set the shared scale on the product (`Multiply` only).
    pub fn set_outputscale(&mut self, value: f64) -> KernelResult<()> {
        match &mut self.composition {
            Composition::Multiply { outputscale, .. } => outputscale.set_value(value),
            _ => Err(KernelError::UnknownParameter {
                name: OUTPUTSCALE.to_string(),
            }),
        }
    }

    /// Covariance between `x1` and `x2`; `x2 = None` means `x2 = x1`.
    /// `params` reaches both sub-kernels unchanged.
    pub fn covariance(
        &self,
        x1: &KernelInput,
        x2: Option<&KernelInput>,
        params: &EvalParams,
    ) -> KernelResult<Array2<f64>> {
        let x2 = x2.unwrap_or(x1);
        let (t1, e1) = (&x1.tokens, &x1.embeddings);
        let (t2, e2) = (&x2.tokens, &x2.embeddings);

        match &self.composition {
            Composition::WeightedSum {
                structure,
                sequence,
                pi,
            } => {
                let pi = pi.value();
                let k_struct = structure.forward(t1, t2, params)?;
                let k_seq = sequence.forward(e1, e2, params)?;
                check_same_shape(&k_struct, &k_seq)?;
                Ok(k_struct * pi + k_seq * (1.0 - pi))
            }
            Composition::Add {
                structure,
                sequence,
            } => {
                let k_struct = structure.forward(t1, t2, params)?;
                let k_seq = sequence.forward(e1, e2, params)?;
                check_same_shape(&k_struct, &k_seq)?;
                Ok(k_struct + k_seq)
            }
            Composition::Multiply {
                structure,
                sequence,
                outputscale,
            } => {
                let k_struct = structure.forward(t1, t2, params)?;
                let k_seq = sequence.forward(e1, e2, params)?;
                check_same_shape(&k_struct, &k_seq)?;
                Ok(k_struct * k_seq * outputscale.value())
            }
        }
    }
}

fn check_same_shape(a: &Array2<f64>, b: &Array2<f64>) -> KernelResult<()> {
    if a.dim() != b.dim() {
        return Err(KernelError::ShapeMismatch {
            context: "sub-kernel output elements".to_string(),
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

impl<S, Q> Kernel for CompositeKernel<S, Q>
where
    S: Kernel<Input = Tokens>,
    Q: Kernel<Input = Embeddings>,
{
    type Input = KernelInput;

    fn forward(&self, x1: &KernelInput, x2: &KernelInput, params: &EvalParams) -> KernelResult<Array2<f64>> {
        self.covariance(x1, Some(x2), params)
    }

    fn named_parameters(&self) -> Vec<(String, f64)> {
        match &self.composition {
            Composition::WeightedSum {
                structure,
                sequence,
                pi,
            } => {
                let mut params = vec![(PI.to_string(), pi.raw())];
                params.extend(prefixed(STRUCTURE, structure.named_parameters()));
                params.extend(prefixed(SEQUENCE, sequence.named_parameters()));
                params
            }
            Composition::Add {
                structure,
                sequence,
            } => {
                let mut params = prefixed(STRUCTURE, structure.named_parameters());
                params.extend(prefixed(SEQUENCE, sequence.named_parameters()));
                params
            }
            Composition::Multiply {
                structure,
                sequence,
                outputscale,
            } => {
                let mut params = vec![(OUTPUTSCALE.to_string(), outputscale.raw())];
                params.extend(prefixed(STRUCTURE, structure.named_parameters()));
                params.extend(prefixed(SEQUENCE, sequence.named_parameters()));
                params
            }
        }
    }

    fn set_raw_parameter(&mut self, name: &str, raw: f64) -> KernelResult<()> {
        let unknown = || {
            Err(KernelError::UnknownParameter {
                name: name.to_string(),
            })
        };
        match &mut self.composition {
            Composition::WeightedSum {
                structure,
                sequence,
                pi,
            } => {
                if name == PI {
                    pi.set_raw(raw);
                    return Ok(());
                }
                forward_to_child(STRUCTURE, structure, name, raw)
                    .or_else(|| forward_to_child(SEQUENCE, sequence, name, raw))
                    .unwrap_or_else(unknown)
            }
            Composition::Add {
                structure,
                sequence,
            } => forward_to_child(STRUCTURE, structure, name, raw)
                .or_else(|| forward_to_child(SEQUENCE, sequence, name, raw))
                .unwrap_or_else(unknown),
            Composition::Multiply {
                structure,
                sequence,
                outputscale,
            } => {
                if name == OUTPUTSCALE {
                    outputscale.set_raw(raw);
                    return Ok(());
                }
                forward_to_child(STRUCTURE, structure, name, raw)
                    .or_else(|| forward_to_child(SEQUENCE, sequence, name, raw))
                    .unwrap_or_else(unknown)
            }
        }
    }
}
