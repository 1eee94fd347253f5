//! Error handling for post-estimation inference.
//!
//! `InferenceError` covers the covariance step (singular or indefinite
//! observed information), interval configuration, and derivative failures
//! passed up from the optimizer layer. `InferenceResult<T>` is the matching
//! result alias.
use crate::optimization::errors::OptError;

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Covariance ----
    /// Observed information is singular, near-singular or not positive
    /// definite at the optimum (e.g. collinear design columns).
    SingularHessian { min_eigenvalue: f64, max_eigenvalue: f64 },

    /// Covariance or information matrix has the wrong shape.
    MatrixDimMismatch { expected: usize, found: (usize, usize) },

    // ---- Intervals ----
    /// Confidence level must lie strictly inside (0, 1).
    InvalidConfidenceLevel { level: f64 },

    /// Number of coefficient names does not match the estimate length.
    NameCountMismatch { expected: usize, found: usize },

    // ---- Derivatives ----
    /// Finite-difference Hessian construction failed.
    Derivative(OptError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Derivative(err)
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Covariance ----
            InferenceError::SingularHessian { min_eigenvalue, max_eigenvalue } => write!(
                f,
                "Inference Error: observed information is singular or not positive definite \
                 (eigenvalues in [{min_eigenvalue:e}, {max_eigenvalue:e}]); \
                 check for collinear design columns"
            ),
            InferenceError::MatrixDimMismatch { expected, found } => write!(
                f,
                "Inference Error: expected a ({expected}, {expected}) matrix, found {found:?}"
            ),

            // ---- Intervals ----
            InferenceError::InvalidConfidenceLevel { level } => {
                write!(f, "Inference Error: confidence level {level} must lie in (0, 1)")
            }
            InferenceError::NameCountMismatch { expected, found } => write!(
                f,
                "Inference Error: expected {expected} coefficient names, found {found}"
            ),

            // ---- Derivatives ----
            InferenceError::Derivative(err) => write!(f, "Inference Error: {err}"),
        }
    }
}
