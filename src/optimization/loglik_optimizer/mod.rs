//! loglik_optimizer — argmin-backed maximum-likelihood driver.
//!
//! Purpose
//! -------
//! Maximize a model's log-likelihood `ℓ(β)` with L-BFGS. Models implement
//! [`LogLikelihood`]; callers invoke [`maximize`] with a starting vector, the
//! model's data and [`MLEOptions`], and get an [`OptimOutcome`] back.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] exposes `c(β) = -ℓ(β)` and `-∇ℓ(β)` to argmin,
//!   falling back to finite differences when a model has no gradient.
//! - [`builders`] construct L-BFGS with More–Thuente or Hager–Zhang line
//!   search; [`run::run_lbfgs`] executes it and normalizes the final state.
//! - [`line_search::FeasibleStep`] wraps either search so trial steps stay
//!   where `ℓ` is finite.
//! - [`finite_diff::compute_hessian`] differentiates a gradient map; the
//!   covariance step builds observed information on top of it.
//! - [`validation`] holds the shared shape and finiteness checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - `value` returns `-∞` for infeasible points; the adapter reports `+∞`
//!   cost there and the line-search guard steps back from them. The starting
//!   point must be feasible.
//! - `OptimOutcome::converged` is `true` only when a tolerance was met.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions, FD fallbacks, configuration
//!   validation and termination mapping on toy objectives.
//! - `tests/` runs the driver end to end on Poisson and MNL likelihoods.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod line_search;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
