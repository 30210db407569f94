//! Learnable parameters stored unconstrained and mapped onto their domain.
//!
//! An optimizer works on the raw value over the whole real line; the kernel
//! reads the constrained value.

use kermut_core::errors::{KernelError, KernelResult};

/// Softplus is linear to within f64 precision past this point.
const SOFTPLUS_THRESHOLD: f64 = 20.0;

/// Domain of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// `[lower, upper]`, through a scaled sigmoid.
    Interval { lower: f64, upper: f64 },
    /// `(0, ∞)`, through softplus.
    Positive,
}

impl Constraint {
    /// Raw → constrained.
    pub fn transform(&self, raw: f64) -> f64 {
        match *self {
            Self::Interval { lower, upper } => lower + (upper - lower) * sigmoid(raw),
            Self::Positive => softplus(raw),
        }
    }

    /// Constrained → raw. `None` outside the domain.
    pub fn inverse_transform(&self, value: f64) -> Option<f64> {
        if !self.contains(value) {
            return None;
        }
        Some(match *self {
            Self::Interval { lower, upper } => logit((value - lower) / (upper - lower)),
            Self::Positive => inverse_softplus(value),
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::Interval { lower, upper } => (lower..=upper).contains(&value),
            Self::Positive => value > 0.0 && value.is_finite(),
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Interval { lower, upper } => (lower, upper),
            Self::Positive => (0.0, f64::INFINITY),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

fn softplus(x: f64) -> f64 {
    if x > SOFTPLUS_THRESHOLD {
        x
    } else {
        x.exp().ln_1p()
    }
}

fn inverse_softplus(y: f64) -> f64 {
    if y > SOFTPLUS_THRESHOLD {
        y
    } else {
        y.exp_m1().ln()
    }
}

/// A named, constrained scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    raw: f64,
    constraint: Constraint,
}

impl Parameter {
    /// Create a parameter holding `value`.
    pub fn new(name: impl Into<String>, value: f64, constraint: Constraint) -> KernelResult<Self> {
        let mut param = Self {
            name: name.into(),
            raw: 0.0,
            constraint,
        };
        param.set_value(value)?;
        Ok(param)
    }

    /// Create a parameter from a raw value.
    pub fn from_raw(name: impl Into<String>, raw: f64, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            raw,
            constraint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> f64 {
        self.raw
    }

    pub fn constraint(&self) -> Constraint {
        self.constraint
    }

    /// Constrained value.
    pub fn value(&self) -> f64 {
        self.constraint.transform(self.raw)
    }

    pub fn set_raw(&mut self, raw: f64) {
        self.raw = raw;
    }

    pub fn set_value(&mut self, value: f64) -> KernelResult<()> {
        let (lower, upper) = self.constraint.bounds();
        self.raw = self
            .constraint
            .inverse_transform(value)
            .ok_or_else(|| KernelError::OutOfBounds {
                name: self.name.clone(),
                value,
                lower,
                upper,
            })?;
        Ok(())
    }
}
