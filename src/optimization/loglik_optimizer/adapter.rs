//! Bridge from a model's [`LogLikelihood`] to argmin's minimization traits.
//!
//! argmin minimizes, so the adapter exposes the negative log-likelihood
//! `c(β) = -ℓ(β)` and the matching gradient `-∇ℓ(β)`. Models without an
//! analytic gradient get a finite-difference gradient of the cost itself
//! (central first, forward as fallback), so no sign flip is needed there.
//!
//! An infeasible point (`ℓ = -∞`) costs `+∞`; the
//! [`line_search`](super::line_search) guard keeps trial steps out of that
//! region.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(β) = -ℓ(β)`.
    ///
    /// `ℓ = -∞` gives `+∞`. NaN or `ℓ = +∞` surfaces as
    /// [`OptError::NonFiniteCost`] carrying the offending log-likelihood.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let loglik = self.f.value(theta, self.data)?;
        if loglik == f64::NEG_INFINITY {
            return Ok(f64::INFINITY);
        }
        if !loglik.is_finite() {
            return Err(OptError::NonFiniteCost { value: loglik }.into());
        }
        Ok(-loglik)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇ℓ(β)` from the model, or a finite-difference gradient of the cost.
    ///
    /// The finite-difference closure must return `f64`, so the first cost
    /// error is parked in a `RefCell` and the closure yields `NaN`. A parked
    /// error or a non-finite central gradient triggers one forward-difference
    /// retry; an error on that retry is returned.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |point: &Theta| -> f64 {
                    self.cost(point).unwrap_or_else(|e| {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        f64::NAN
                    })
                };
                let central = theta.central_diff(&cost_func);
                let central_failed = closure_err.borrow().is_some();
                if !central_failed && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
