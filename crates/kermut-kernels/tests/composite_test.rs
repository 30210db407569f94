//! Composite kernel behavior against constant sub-kernels and the
//! reference kernels.

use std::marker::PhantomData;
use std::sync::Mutex;

use approx::assert_relative_eq;
use kermut_core::config::CompositionMode;
use kermut_core::errors::KernelResult;
use kermut_kernels::*;
use ndarray::{array, Array2};

/// Returns the same matrix for any input and records the params it saw.
struct ConstantKernel<I> {
    matrix: Array2<f64>,
    seen: Mutex<Vec<EvalParams>>,
    _input: PhantomData<fn() -> I>,
}

impl<I> ConstantKernel<I> {
    fn new(matrix: Array2<f64>) -> Self {
        Self {
            matrix,
            seen: Mutex::new(Vec::new()),
            _input: PhantomData,
        }
    }
}

impl<I> Kernel for ConstantKernel<I> {
    type Input = I;

    fn forward(&self, _x1: &I, _x2: &I, params: &EvalParams) -> KernelResult<Array2<f64>> {
        self.seen.lock().unwrap().push(*params);
        Ok(self.matrix.clone())
    }
}

fn a() -> Array2<f64> {
    array![[2.0, 0.5], [0.5, 3.0]]
}

fn b() -> Array2<f64> {
    array![[1.0, -0.25], [-0.25, 4.0]]
}

fn composite(mode: CompositionMode) -> CompositeKernel<ConstantKernel<Tokens>, ConstantKernel<Embeddings>> {
    let mut k = CompositeKernel::new(ConstantKernel::new(a()), ConstantKernel::new(b()), mode);
    match mode {
        CompositionMode::WeightedSum => k.set_structure_outputscale(1.0).unwrap(),
        CompositionMode::Add => {
            k.set_structure_outputscale(1.0).unwrap();
            k.set_sequence_outputscale(1.0).unwrap();
        }
        CompositionMode::Multiply => k.set_outputscale(1.0).unwrap(),
    }
    k
}

fn input() -> KernelInput {
    KernelInput::new(array![[0usize, 1], [2, 3]], array![[0.0f32, 1.0], [1.0, 0.0]]).unwrap()
}

fn assert_matrix_eq(got: &Array2<f64>, want: &Array2<f64>) {
    assert_eq!(got.dim(), want.dim());
    for (g, w) in got.iter().zip(want.iter()) {
        assert_relative_eq!(*g, *w, max_relative = 1e-9);
    }
}

#[test]
fn weighted_sum_mixes_by_pi() {
    let mut k = composite(CompositionMode::WeightedSum);
    k.set_pi(0.3).unwrap();
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() * 0.3 + b() * 0.7));
}

#[test]
fn weighted_sum_scales_structure_only() {
    let mut k = composite(CompositionMode::WeightedSum);
    k.set_structure_outputscale(2.0).unwrap();
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() * 2.0 * 0.5 + b() * 0.5));
}

#[test]
fn add_sums_sub_kernels() {
    let k = composite(CompositionMode::Add);
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() + b()));
}

#[test]
fn add_scales_each_sub_kernel() {
    let mut k = composite(CompositionMode::Add);
    k.set_structure_outputscale(2.0).unwrap();
    k.set_sequence_outputscale(3.0).unwrap();
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() * 2.0 + b() * 3.0));
}

#[test]
fn multiply_scales_elementwise_product() {
    let k = composite(CompositionMode::Multiply);
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() * b()));

    let mut k = composite(CompositionMode::Multiply);
    k.set_outputscale(0.5).unwrap();
    let got = k.covariance(&input(), None, &EvalParams::default()).unwrap();
    assert_matrix_eq(&got, &(a() * b() * 0.5));
}

#[test]
fn sequence_scale_only_exists_for_add() {
    let mut k = composite(CompositionMode::WeightedSum);
    assert!(k.set_sequence_outputscale(1.0).is_err());
    let mut k = composite(CompositionMode::Multiply);
    assert!(k.set_sequence_outputscale(1.0).is_err());
}

#[test]
fn params_reach_both_sub_kernels() {
    let k = composite(CompositionMode::Add);
    let params = EvalParams { diag: true };
    k.covariance(&input(), None, &params).unwrap();

    let Composition::Add { structure, sequence } = k.composition() else {
        panic!("expected Add");
    };
    assert_eq!(*structure.base().seen.lock().unwrap(), vec![params]);
    assert_eq!(*sequence.base().seen.lock().unwrap(), vec![params]);
}

#[test]
fn omitted_x2_equals_explicit_self() {
    let x = KernelInput::new(
        array![[0usize, 1, 2], [0, 4, 2], [3, 1, 2]],
        array![[0.1f32, 0.2], [0.3, -0.2], [1.0, 0.0]],
    )
    .unwrap();
    for mode in [
        CompositionMode::WeightedSum,
        CompositionMode::Add,
        CompositionMode::Multiply,
    ] {
        let k = CompositeKernel::new(HammingKernel::default(), RbfKernel::default(), mode);
        let implicit = k.covariance(&x, None, &EvalParams::default()).unwrap();
        let explicit = k.covariance(&x, Some(&x), &EvalParams::default()).unwrap();
        assert_eq!(implicit, explicit);
        let via_trait = k.forward(&x, &x, &EvalParams::default()).unwrap();
        assert_eq!(implicit, via_trait);
    }
}

#[test]
fn self_covariance_is_symmetric_with_positive_diagonal() {
    let x = KernelInput::new(
        array![[0usize, 1, 2], [0, 4, 2], [3, 1, 2], [3, 4, 5]],
        array![[0.1f32, 0.2], [0.3, -0.2], [1.0, 0.0], [-1.0, 2.0]],
    )
    .unwrap();
    for mode in [
        CompositionMode::WeightedSum,
        CompositionMode::Add,
        CompositionMode::Multiply,
    ] {
        let k = CompositeKernel::new(HammingKernel::new(1.5).unwrap(), RbfKernel::new(0.8).unwrap(), mode);
        let cov = k.covariance(&x, None, &EvalParams::default()).unwrap();
        assert_eq!(cov.dim(), (4, 4));
        for i in 0..4 {
            assert!(cov[[i, i]] > 0.0);
            for j in 0..4 {
                assert_relative_eq!(cov[[i, j]], cov[[j, i]], epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn cross_covariance_has_rectangular_shape() {
    let x1 = input();
    let x2 = KernelInput::new(array![[0usize, 1]], array![[0.0f32, 1.0]]).unwrap();
    let k = CompositeKernel::new(
        HammingKernel::default(),
        RbfKernel::default(),
        CompositionMode::WeightedSum,
    );
    let cov = k.covariance(&x1, Some(&x2), &EvalParams::default()).unwrap();
    assert_eq!(cov.dim(), (2, 1));
}

#[test]
fn diag_matches_full_diagonal() {
    let x = input();
    let k = CompositeKernel::new(
        HammingKernel::default(),
        RbfKernel::default(),
        CompositionMode::Multiply,
    );
    let full = k.covariance(&x, None, &EvalParams::default()).unwrap();
    let diag = k.covariance(&x, None, &EvalParams { diag: true }).unwrap();
    assert_eq!(diag.dim(), (2, 1));
    for i in 0..2 {
        assert_relative_eq!(diag[[i, 0]], full[[i, i]], epsilon = 1e-12);
    }
}
