//! inference — covariance, standard errors and coefficient tables at the
//! MLE.
//!
//! Purpose
//! -------
//! Quantify the uncertainty of a maximum-likelihood estimate `β̂`. The
//! observed information is obtained numerically, inverted with an explicit
//! singularity check, and summarized as normal-approximation intervals.
//!
//! Key behaviors
//! -------------
//! - [`observed_information`]: `-∇²ℓ(β̂)` by finite differences.
//! - [`calc_covariance`]: eigen-based inverse, failing with
//!   [`InferenceError::SingularHessian`] on (near-)singular or indefinite
//!   information.
//! - [`calc_standard_errors`]: `√diag(Σ)`.
//! - [`CoefficientTable`]: name / estimate / SE / z / p / interval rows at a
//!   configurable [`IntervalOptions::level`].
//!
//! Conventions
//! -----------
//! - Information and covariance are on the summed log-likelihood scale.
//! - A singular information matrix is reported as an error, never papered
//!   over with a pseudoinverse; it is distinct from optimizer
//!   non-convergence.
//!
//! Testing notes
//! -------------
//! - Unit tests use quadratic likelihoods with closed-form information.
//! - `tests/` covers collinear designs and SE agreement on simulated data.

pub mod errors;
pub mod hessian;
pub mod intervals;

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{
    SINGULARITY_RCOND, calc_covariance, calc_standard_errors, observed_information,
};
pub use self::intervals::{CoefficientRow, CoefficientTable, IntervalOptions};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::{calc_covariance, calc_standard_errors, observed_information};
    pub use super::intervals::{CoefficientTable, IntervalOptions};
}
