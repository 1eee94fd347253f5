//! Numeric aliases and L-BFGS solver wiring shared by the optimizer.
//!
//! Every vector the optimizer touches is an `ndarray` container over `f64`.
//! Coefficient vectors β for both the Poisson and the multinomial-logit
//! models travel as [`Theta`]; their gradients as [`Grad`]; observed
//! information matrices as [`Hessian`].
//!
//! `Cost` is the scalar handed to argmin, i.e. `c(β) = -ℓ(β)`. The solver
//! aliases pin argmin's `(Param, Gradient, Float)` generics to these types so
//! builders and runners never spell them out.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

use crate::optimization::loglik_optimizer::line_search::FeasibleStep;

/// Coefficient vector β (length = number of design columns).
pub type Theta = Array1<f64>;

/// Gradient of ℓ or of the cost, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `k × k` second-derivative matrix.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters keyed by argmin's names (`cost_count`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS whose Hager–Zhang search is guarded against infeasible steps.
pub type LbfgsHagerZhang = LBFGS<FeasibleStep<HagerZhangLS>, Theta, Grad, Cost>;

/// L-BFGS whose More–Thuente search is guarded against infeasible steps.
pub type LbfgsMoreThuente = LBFGS<FeasibleStep<MoreThuenteLS>, Theta, Grad, Cost>;
