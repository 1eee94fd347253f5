//! rust_choice_models — maximum-likelihood and Bayesian estimation for
//! Poisson count regression and multinomial-logit discrete choice.
//!
//! Purpose
//! -------
//! Estimate the coefficients of two models from a cleaned numeric design
//! matrix and response:
//! - Poisson regression with log link, fit by L-BFGS maximum likelihood with
//!   observed-information standard errors;
//! - grouped multinomial logit, fit either by maximum likelihood or by a
//!   random-walk Metropolis–Hastings sampler under an explicit Normal prior.
//!
//! Key behaviors
//! -------------
//! - [`data`]: validated design matrices (named columns, treatment/price
//!   roles), count responses and grouped choice sets.
//! - [`models`]: likelihood kernels, the [`LogLikelihood`] bindings and the
//!   `fit` / `sample` entry points.
//! - [`optimization`]: the argmin-backed maximizer, finite differences and
//!   numerically stable softmax / log-sum-exp.
//! - [`inference`]: observed information, covariance, standard errors and
//!   coefficient tables.
//! - [`bayes`]: Metropolis–Hastings chains, posterior summaries and
//!   convergence diagnostics.
//! - [`simulate`]: synthetic data from known coefficients.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated once at construction; kernels assume finite
//!   designs and well-formed groups.
//! - Everything runs single-threaded and in memory. Random numbers come only
//!   from generators passed in or seeded explicitly.
//!
//! Conventions
//! -----------
//! - Log-likelihoods include all normalizing constants and are summed over
//!   observations (or choice-set groups).
//! - Each layer has its own error enum; model entry points return
//!   [`models::EstimationError`].
//! - Diagnostics go through the `log` facade; install any logger to see them.
//!
//! [`LogLikelihood`]: optimization::loglik_optimizer::LogLikelihood

pub mod bayes;
pub mod data;
pub mod inference;
pub mod models;
pub mod optimization;
pub mod simulate;

pub mod prelude {
    pub use crate::bayes::prelude::*;
    pub use crate::data::{ChoiceData, ChoiceDataset, CountData, CountResponse, DesignMatrix};
    pub use crate::inference::prelude::*;
    pub use crate::models::{
        EstimationError, EstimationResult, MleFit, MultinomialLogit, PoissonRegression,
    };
    pub use crate::optimization::loglik_optimizer::prelude::*;
}
