//! # kermut-kernels
//!
//! Covariance kernels over paired (tokens, embedding) inputs. A structure
//! kernel over tokenized sequences and a sequence kernel over embeddings
//! are combined by [`CompositeKernel`] under one of three compositions.

pub mod composite;
pub mod constraints;
pub mod hamming;
pub mod kernel;
pub mod rbf;
pub mod scale;

pub use composite::{Composition, CompositeKernel};
pub use constraints::{Constraint, Parameter};
pub use hamming::HammingKernel;
pub use kernel::{Embeddings, EvalParams, Kernel, KernelInput, Tokens};
pub use rbf::RbfKernel;
pub use scale::ScaleKernel;
