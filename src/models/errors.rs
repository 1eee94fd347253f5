//! Top-level error for model entry points (`fit`, `sample`).
//!
//! Each layer keeps its own error enum; `EstimationError` wraps them so a
//! caller of a model method handles one type. Optimizer non-convergence is
//! its own variant here because the optimizer reports it as a status, not
//! as an error.
use crate::{
    bayes::errors::SamplerError, data::errors::DataError, inference::errors::InferenceError,
    optimization::errors::OptError,
};

pub type EstimationResult<T> = Result<T, EstimationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Input containers rejected the data.
    Data(DataError),

    /// The optimizer failed outright (bad configuration, infeasible start,
    /// backend error).
    Optimization(OptError),

    /// L-BFGS stopped without meeting a tolerance.
    NonConvergence { status: String, iterations: usize },

    /// Covariance step failed (singular information, bad interval level).
    Inference(InferenceError),

    /// Metropolis–Hastings configuration or summary failure.
    Sampler(SamplerError),
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationError::Data(err) => write!(f, "Data error: {err}"),
            EstimationError::Optimization(err) => write!(f, "Optimization error: {err}"),
            EstimationError::NonConvergence { status, iterations } => write!(
                f,
                "Optimizer did not converge after {iterations} iterations (status: {status})"
            ),
            EstimationError::Inference(err) => write!(f, "{err}"),
            EstimationError::Sampler(err) => write!(f, "Sampler error: {err}"),
        }
    }
}

impl From<DataError> for EstimationError {
    fn from(err: DataError) -> Self {
        EstimationError::Data(err)
    }
}

impl From<OptError> for EstimationError {
    fn from(err: OptError) -> Self {
        EstimationError::Optimization(err)
    }
}

impl From<InferenceError> for EstimationError {
    fn from(err: InferenceError) -> Self {
        EstimationError::Inference(err)
    }
}

impl From<SamplerError> for EstimationError {
    fn from(err: SamplerError) -> Self {
        EstimationError::Sampler(err)
    }
}
