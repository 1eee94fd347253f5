//! numerical_stability — overflow guards shared by the likelihood kernels.
//!
//! Purpose
//! -------
//! Keep the constants and transforms that protect `exp` from overflowing in
//! one place: the Poisson kernel's feasibility bound on the linear predictor
//! and the max-shifted log-sum-exp / softmax used by the multinomial logit.
//!
//! Conventions
//! -----------
//! - Pure functions on `ndarray` views; no logging, no global state.
//! - Callers validate inputs; non-finite utilities propagate rather than
//!   being repaired here.

pub mod transformations;

pub use self::transformations::{MAX_LINEAR_PREDICTOR, log_sum_exp, softmax};

pub mod prelude {
    pub use super::transformations::{MAX_LINEAR_PREDICTOR, log_sum_exp, softmax};
}
