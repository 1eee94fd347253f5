//! inference::hessian — observed information, covariance and standard
//! errors at the MLE.
//!
//! Purpose
//! -------
//! Turn a fitted likelihood into a covariance matrix for `β̂`. The observed
//! information `J(β̂) = -∂²ℓ/∂β∂βᵀ` is built by finite-differencing the
//! model's gradient, inverted by symmetric eigendecomposition, and reduced
//! to standard errors.
//!
//! Key behaviors
//! -------------
//! - [`observed_information`] differentiates the analytic gradient when the
//!   model provides one, otherwise takes second differences of `ℓ`.
//! - [`calc_covariance`] refuses singular, near-singular and indefinite
//!   information matrices with [`InferenceError::SingularHessian`] instead of
//!   returning a pseudoinverse. Collinear design columns end up here.
//! - [`calc_standard_errors`] takes `√diag(Σ)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything is on the summed log-likelihood scale, so `Σ = J⁻¹` is the
//!   usual asymptotic covariance of `β̂`.
//! - `J` is symmetrized upstream by
//!   [`compute_hessian`](crate::optimization::loglik_optimizer::finite_diff::compute_hessian);
//!   it is copied into `nalgebra` as is.
//! - A matrix is singular for our purposes when
//!   `λ_min ≤ SINGULARITY_RCOND · λ_max` or `λ_min ≤ 0`.
//!
//! Testing notes
//! -------------
//! - Unit tests use quadratic likelihoods with known information, and a
//!   rank-deficient matrix for the singular path.
//! - Integration tests check duplicated design columns end to end.
use crate::inference::errors::{InferenceError, InferenceResult};
use crate::optimization::loglik_optimizer::{
    Hessian, LogLikelihood, Theta,
    finite_diff::{compute_hessian, compute_hessian_nograd},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Reciprocal-condition threshold below which the information matrix is
/// treated as singular.
pub const SINGULARITY_RCOND: f64 = 1e-9;

/// Observed information `J(θ̂) = -∇²ℓ(θ̂)`.
///
/// Parameters
/// ----------
/// - `model`, `data`: the fitted likelihood.
/// - `theta_hat`: point of evaluation, normally the MLE.
///
/// Returns
/// -------
/// A finite, symmetric `k × k` matrix.
///
/// Errors
/// ------
/// - [`InferenceError::Derivative`] when the finite-difference Hessian has
///   non-finite entries, e.g. because a perturbed point is infeasible.
///
/// Notes
/// -----
/// - Evaluation failures inside the finite-difference closures are mapped to
///   `NaN`, which the Hessian validation then rejects.
pub fn observed_information<M: LogLikelihood>(
    model: &M, theta_hat: &Theta, data: &M::Data,
) -> InferenceResult<Hessian> {
    let k = theta_hat.len();
    let nan_grad = || Array1::from_elem(k, f64::NAN);
    let hessian = if model.grad(theta_hat, data).is_ok() {
        let grad_map = |t: &Theta| model.grad(t, data).unwrap_or_else(|_| nan_grad());
        compute_hessian(&grad_map, theta_hat)?
    } else {
        let value = |t: &Theta| model.value(t, data).unwrap_or(f64::NAN);
        compute_hessian_nograd(&value, theta_hat)?
    };
    Ok(-hessian)
}

/// Covariance `Σ = J⁻¹` via symmetric eigendecomposition `J = QΛQᵀ`.
///
/// Errors
/// ------
/// - [`InferenceError::MatrixDimMismatch`] for a non-square input.
/// - [`InferenceError::SingularHessian`] when the smallest eigenvalue is
///   non-positive or at most [`SINGULARITY_RCOND`] times the largest.
pub fn calc_covariance(information: &Array2<f64>) -> InferenceResult<Array2<f64>> {
    let k = information.nrows();
    if information.ncols() != k || k == 0 {
        return Err(InferenceError::MatrixDimMismatch { expected: k, found: information.dim() });
    }
    let mut info_nalg = DMatrix::<f64>::zeros(k, k);
    fill_dmatrix(information, &mut info_nalg);
    let eigen = info_nalg.symmetric_eigen();
    let min_eigenvalue = eigen.eigenvalues.min();
    let max_eigenvalue = eigen.eigenvalues.max();
    if !(min_eigenvalue > 0.0) || min_eigenvalue <= SINGULARITY_RCOND * max_eigenvalue {
        log::warn!(
            "observed information is singular: eigenvalues in [{min_eigenvalue:e}, {max_eigenvalue:e}]"
        );
        return Err(InferenceError::SingularHessian { min_eigenvalue, max_eigenvalue });
    }

    let q = &eigen.eigenvectors;
    let lambda = &eigen.eigenvalues;
    let covariance = Array2::from_shape_fn((k, k), |(i, j)| {
        (0..k).map(|m| q[(i, m)] * q[(j, m)] / lambda[m]).sum::<f64>()
    });
    Ok(covariance)
}

/// Standard errors `√diag(Σ)`.
pub fn calc_standard_errors(covariance: &Array2<f64>) -> Array1<f64> {
    covariance.diag().mapv(f64::sqrt)
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into a preallocated `DMatrix` of the same shape.
fn fill_dmatrix(source: &Array2<f64>, target: &mut DMatrix<f64>) {
    for ((i, j), &value) in source.indexed_iter() {
        target[(i, j)] = value;
    }
}
