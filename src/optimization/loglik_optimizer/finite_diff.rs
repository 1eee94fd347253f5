//! Finite-difference gradients and Hessians with validation.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate so the optimizer and the covariance step can
//! request derivatives of a likelihood without touching its API, and always
//! receive validated, finite results.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient with error capture, used
//!   by the argmin adapter when a model has no analytic gradient or its
//!   central-difference gradient failed.
//! - [`compute_hessian`]: Jacobian of a gradient map by central differences,
//!   falling back to forward differences, then symmetrized. The observed
//!   information at `θ̂` is built on top of this.
//! - [`compute_hessian_nograd`]: second differences of a scalar function,
//!   for likelihoods without an analytic gradient. Differencing a
//!   finite-difference gradient again at `√ε` steps amplifies rounding
//!   noise, so this path uses a four-point stencil at `ε^¼` steps instead.
//!
//! Conventions
//! -----------
//! - Gradient-map Hessians use `finitediff`'s default steps (`√ε`).
//! - Errors come back as [`OptError`](crate::optimization::errors::OptError);
//!   argmin's `Error` only appears at the closure boundary of
//!   [`run_fd_diff`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` is expected to park its first evaluation error in `closure_err`
/// and return `NaN`; the cell is cleared on entry and inspected afterwards.
///
/// # Errors
/// - The parked error, converted into `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Jacobian of the gradient map `f` at `theta`.
///
/// Parameters
/// ----------
/// - `f`: gradient map `θ ↦ ∇g(θ)` for some scalar `g`.
/// - `theta`: evaluation point; its length fixes the `k × k` shape.
///
/// Returns
/// -------
/// A finite, symmetric `k × k` matrix. The central-difference estimate is
/// used when it validates; otherwise the forward-difference estimate.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation. The central
///   failure itself is not reported.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hessian = theta.central_hessian(f);
    if validate_hessian(&hessian, dim).is_err() {
        hessian = theta.forward_hessian(f);
        validate_hessian(&hessian, dim)?;
    }
    symmetrize_hess(&mut hessian);
    Ok(hessian)
}

/// Hessian of a scalar function by central second differences.
///
/// `H_ij ≈ [f(θ+hᵢ+hⱼ) − f(θ+hᵢ−hⱼ) − f(θ−hᵢ+hⱼ) + f(θ−hᵢ−hⱼ)] / (4 hᵢ hⱼ)`
/// with `hᵢ = ε^¼ · max(1, |θᵢ|)`; the diagonal uses the same stencil with
/// `i = j`. Only the upper triangle is evaluated.
///
/// # Errors
/// `OptError::InvalidHessian` when any stencil value is non-finite.
pub fn compute_hessian_nograd<F: Fn(&Theta) -> f64>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let steps = theta.mapv(|t| f64::EPSILON.powf(0.25) * t.abs().max(1.0));
    let mut point = theta.clone();
    let mut eval = |i: usize, si: f64, j: usize, sj: f64| {
        point[i] += si * steps[i];
        point[j] += sj * steps[j];
        let value = f(&point);
        point[i] = theta[i];
        point[j] = theta[j];
        value
    };
    let mut hessian = Hessian::zeros((dim, dim));
    for i in 0..dim {
        for j in i..dim {
            let value = (eval(i, 1.0, j, 1.0) - eval(i, 1.0, j, -1.0) - eval(i, -1.0, j, 1.0)
                + eval(i, -1.0, j, -1.0))
                / (4.0 * steps[i] * steps[j]);
            hessian[[i, j]] = value;
            hessian[[j, i]] = value;
        }
    }
    validate_hessian(&hessian, dim)?;
    Ok(hessian)
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
