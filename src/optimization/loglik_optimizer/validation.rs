//! Consistency checks shared by the optimizer, the models and the
//! covariance step.
//!
//! Each helper reports the first offending element through a dedicated
//! [`OptError`] variant so failures point at an index.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Accepts `None`; otherwise the tolerance must be finite and `> 0`.
///
/// # Errors
/// [`OptError::InvalidTolGrad`].
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Accepts `None`; otherwise the tolerance must be finite and `> 0`.
///
/// # Errors
/// [`OptError::InvalidTolCost`].
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Check a candidate coefficient vector against the design width.
///
/// Used by the models' `check` hooks and by the sampler before the first
/// posterior evaluation.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] when `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta_input(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Gradient must have length `dim` and finite entries.
///
/// # Errors
/// [`OptError::GradientDimMismatch`] or [`OptError::InvalidGradient`].
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    if let Some((index, &value)) = grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        });
    }
    Ok(())
}

/// Unwrap the solver's best parameter, rejecting absent or non-finite ones.
///
/// # Errors
/// [`OptError::MissingThetaHat`] or [`OptError::InvalidThetaHat`].
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// # Errors
/// [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Hessian must be `dim × dim` with finite entries.
///
/// # Errors
/// [`OptError::HessianDimMismatch`] or [`OptError::InvalidHessian`] (first
/// offending cell).
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    if let Some(((row, col), &value)) = hessian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidHessian { row, col, value });
    }
    Ok(())
}
