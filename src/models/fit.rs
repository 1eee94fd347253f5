//! Shared maximum-likelihood fit path for every model.
//!
//! `fit_mle` runs the optimizer, refuses non-converged outcomes, builds the
//! observed information at `β̂`, inverts it and assembles the coefficient
//! table. Both regression models delegate here so their fits behave
//! identically.
use crate::inference::{
    CoefficientTable, IntervalOptions, calc_covariance, calc_standard_errors,
    observed_information,
};
use crate::models::errors::{EstimationError, EstimationResult};
use crate::optimization::loglik_optimizer::{
    LogLikelihood, MLEOptions, OptimOutcome, Theta, maximize,
};
use ndarray::{Array1, Array2};

/// Fitted maximum-likelihood model.
#[derive(Debug, Clone, PartialEq)]
pub struct MleFit {
    /// Optimizer result; `outcome.converged` is always `true` here.
    pub outcome: OptimOutcome,
    /// Observed information `-∇²ℓ(β̂)`.
    pub information: Array2<f64>,
    /// `J⁻¹`.
    pub covariance: Array2<f64>,
    pub table: CoefficientTable,
}

impl MleFit {
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.outcome.theta_hat
    }

    pub fn std_errors(&self) -> Array1<f64> {
        calc_standard_errors(&self.covariance)
    }

    /// `ℓ(β̂)`, including all normalizing constants.
    pub fn log_likelihood(&self) -> f64 {
        self.outcome.value
    }

    /// Akaike information criterion `2k − 2ℓ(β̂)`.
    pub fn aic(&self) -> f64 {
        2.0 * self.outcome.theta_hat.len() as f64 - 2.0 * self.outcome.value
    }
}

/// Maximize `model`'s likelihood from `theta0` and compute standard errors.
///
/// Errors
/// ------
/// - [`EstimationError::Optimization`] for configuration or runtime failures.
/// - [`EstimationError::NonConvergence`] when no tolerance was met.
/// - [`EstimationError::Inference`] for a singular information matrix or an
///   invalid name list.
pub fn fit_mle<M: LogLikelihood>(
    model: &M, theta0: Theta, data: &M::Data, names: &[String], opts: &MLEOptions,
    interval: &IntervalOptions,
) -> EstimationResult<MleFit> {
    let outcome = maximize(model, theta0, data, opts)?;
    if !outcome.converged {
        log::warn!(
            "likelihood maximization stopped without converging after {} iterations ({})",
            outcome.iterations,
            outcome.status
        );
        return Err(EstimationError::NonConvergence {
            status: outcome.status,
            iterations: outcome.iterations,
        });
    }
    log::debug!(
        "likelihood maximized: loglik = {:.6} after {} iterations ({})",
        outcome.value,
        outcome.iterations,
        outcome.status
    );

    let information = observed_information(model, &outcome.theta_hat, data)?;
    let covariance = calc_covariance(&information)?;
    let std_errors = calc_standard_errors(&covariance);
    let table = CoefficientTable::new(names, &outcome.theta_hat, &std_errors, interval)?;
    Ok(MleFit { outcome, information, covariance, table })
}
