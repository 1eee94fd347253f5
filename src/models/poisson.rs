//! models::poisson — Poisson regression with a log link.
//!
//! Purpose
//! -------
//! Fit `yᵢ ~ Poisson(λᵢ)`, `ln λᵢ = xᵢ·β`, by maximum likelihood and report
//! standard errors from the observed information.
//!
//! Key behaviors
//! -------------
//! - [`poisson_log_likelihood`] is the pure kernel
//!   `ℓ(β) = Σᵢ [yᵢ ηᵢ − exp(ηᵢ) − ln(yᵢ!)]`. It never errors: an overflowing
//!   (or NaN) linear predictor yields `-∞`. A rate that underflows to zero
//!   is not infeasible; the term is `yᵢ ηᵢ` and stays finite.
//! - [`PoissonRegression`] wires the kernel into the optimizer with the
//!   analytic score `Xᵀ(y − λ)`.
//! - [`PoissonRegression::fit`] runs the shared fit path and returns an
//!   [`MleFit`].
//! - [`treatment_rate_ratio`] reports `exp(β_treatment)` with its interval
//!   when the design carries a treatment column role.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ln(yᵢ!)` is included in every reported value (cached on
//!   [`CountResponse`]), so `ℓ` is the full log-likelihood, not a kernel up
//!   to a constant.
//! - Any `ηᵢ > MAX_LINEAR_PREDICTOR` is treated as overflow.
//!
//! Testing notes
//! -------------
//! - Intercept-only fits recover `ln ȳ` with SE `1/√(n ȳ)`.
//! - The kernel is checked against hand-computed values and for a single
//!   peak in `λ`.
use crate::data::{CountData, CountResponse, DesignMatrix};
use crate::inference::IntervalOptions;
use crate::models::{
    errors::EstimationResult,
    fit::{MleFit, fit_mle},
};
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, Grad, LogLikelihood, MLEOptions, Theta, validation::validate_theta_input,
    },
    numerical_stability::MAX_LINEAR_PREDICTOR,
};
use ndarray::{Array1, ArrayView1};

/// Poisson log-likelihood at `beta`.
///
/// Returns `f64::NEG_INFINITY` when any linear predictor exceeds
/// [`MAX_LINEAR_PREDICTOR`] or is NaN. Very negative predictors are fine:
/// `exp(ηᵢ)` may underflow to zero while `yᵢ ηᵢ` stays exact. The caller
/// guarantees `beta.len() == design.ncols()` and
/// `response.len() == design.nrows()`.
pub fn poisson_log_likelihood(
    beta: ArrayView1<'_, f64>, design: &DesignMatrix, response: &CountResponse,
) -> f64 {
    let eta = design.linear_predictor(beta);
    let mut total = 0.0;
    for ((&eta_i, &y), &log_fact) in
        eta.iter().zip(response.counts().iter()).zip(response.log_factorials().iter())
    {
        if !(eta_i <= MAX_LINEAR_PREDICTOR) {
            return f64::NEG_INFINITY;
        }
        total += y * eta_i - eta_i.exp() - log_fact;
    }
    if total.is_finite() { total } else { f64::NEG_INFINITY }
}

/// `true` when some `xᵢ·β` exceeds [`MAX_LINEAR_PREDICTOR`] (or is NaN).
pub fn poisson_linear_predictor_overflow(
    beta: ArrayView1<'_, f64>, design: &DesignMatrix,
) -> bool {
    design.linear_predictor(beta).iter().any(|&eta| !(eta <= MAX_LINEAR_PREDICTOR))
}

/// Closed-form intercept-only MLE `ln ȳ`; `None` when every count is zero.
pub fn intercept_only_estimate(response: &CountResponse) -> Option<f64> {
    let mean = response.mean();
    if mean > 0.0 { Some(mean.ln()) } else { None }
}

/// Poisson regression with log link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoissonRegression;

impl PoissonRegression {
    pub fn new() -> Self {
        Self
    }

    /// Starting point for `fit`: zeros, except `ln ȳ` on the first all-ones
    /// column when the design has one.
    pub fn starting_values(&self, data: &CountData) -> Theta {
        let mut theta0 = Array1::zeros(data.design.ncols());
        let values = data.design.values();
        let intercept = values.columns().into_iter().position(|col| col.iter().all(|&x| x == 1.0));
        if let (Some(j), Some(b0)) = (intercept, intercept_only_estimate(&data.response)) {
            theta0[j] = b0;
        }
        theta0
    }

    /// Maximum-likelihood fit with observed-information standard errors.
    ///
    /// # Errors
    /// See [`fit_mle`]: configuration and runtime optimizer failures,
    /// non-convergence, or a singular information matrix (e.g. collinear
    /// columns).
    pub fn fit(
        &self, data: &CountData, theta0: Theta, opts: &MLEOptions, interval: &IntervalOptions,
    ) -> EstimationResult<MleFit> {
        let fit = fit_mle(self, theta0, data, data.design.names(), opts, interval)?;
        log::debug!(
            "poisson fit on {} observations, {} coefficients: loglik = {:.6}",
            data.design.nrows(),
            data.design.ncols(),
            fit.log_likelihood()
        );
        Ok(fit)
    }
}

impl LogLikelihood for PoissonRegression {
    type Data = CountData;

    fn value(&self, theta: &Theta, data: &CountData) -> OptResult<Cost> {
        Ok(poisson_log_likelihood(theta.view(), &data.design, &data.response))
    }

    fn check(&self, theta: &Theta, data: &CountData) -> OptResult<()> {
        validate_theta_input(theta, data.design.ncols())
    }

    /// Score `Xᵀ(y − λ)`.
    fn grad(&self, theta: &Theta, data: &CountData) -> OptResult<Grad> {
        let eta = data.design.linear_predictor(theta.view());
        if eta.iter().any(|&e| !(e <= MAX_LINEAR_PREDICTOR)) {
            return Err(OptError::NonFiniteCost { value: f64::NEG_INFINITY });
        }
        let residual = &data.response.counts() - &eta.mapv(f64::exp);
        Ok(data.design.values().t().dot(&residual))
    }
}

/// Multiplicative treatment effect `exp(β_treatment)` with its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRatio {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Rate ratio of the design's treatment column, if it has one.
///
/// Interval bounds are the exponentiated Wald bounds from `fit.table`.
pub fn treatment_rate_ratio(fit: &MleFit, design: &DesignMatrix) -> Option<RateRatio> {
    let index = design.roles().treatment?;
    let row = fit.table.rows().get(index)?;
    Some(RateRatio {
        estimate: row.estimate.exp(),
        lower: row.lower.exp(),
        upper: row.upper.exp(),
    })
}
