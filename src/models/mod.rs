//! models — Poisson regression and multinomial logit.
//!
//! Purpose
//! -------
//! Bind the likelihood kernels to the optimizer and the covariance step.
//! Each model is a zero-sized type implementing
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)
//! with an analytic score, plus a `fit` method that returns an [`MleFit`].
//!
//! Key behaviors
//! -------------
//! - [`poisson`]: log-link count regression, `-∞` sentinel on overflow.
//! - [`mnl`]: grouped softmax choice model; also the likelihood used by the
//!   Metropolis–Hastings sampler.
//! - [`fit`]: shared MLE path (optimize, refuse non-convergence, invert the
//!   observed information, tabulate).
//! - [`errors`]: [`EstimationError`], the single error type of every `fit`
//!   and `sample` entry point.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_choice_models::data::{CountData, CountResponse, DesignMatrix};
//! use rust_choice_models::inference::IntervalOptions;
//! use rust_choice_models::models::PoissonRegression;
//! use rust_choice_models::optimization::loglik_optimizer::MLEOptions;
//!
//! let design = DesignMatrix::new(
//!     array![[1.0, 0.0], [1.0, 1.0], [1.0, 0.0], [1.0, 1.0]],
//!     vec!["const".into(), "treated".into()],
//! )?;
//! let data = CountData::new(design, CountResponse::from_counts(&[2, 4, 3, 5])?)?;
//! let model = PoissonRegression::new();
//! let fit = model.fit(
//!     &data,
//!     model.starting_values(&data),
//!     &MLEOptions::default(),
//!     &IntervalOptions::default(),
//! )?;
//! println!("{}", fit.table);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod errors;
pub mod fit;
pub mod mnl;
pub mod poisson;

pub use self::errors::{EstimationError, EstimationResult};
pub use self::fit::{MleFit, fit_mle};
pub use self::mnl::{MultinomialLogit, choice_probabilities, mnl_log_likelihood, softmax};
pub use self::poisson::{
    PoissonRegression, RateRatio, intercept_only_estimate, poisson_linear_predictor_overflow,
    poisson_log_likelihood, treatment_rate_ratio,
};
