//! Error surface of the likelihood maximizer.
//!
//! Configuration mistakes, non-finite objective/derivative values and
//! failures inside argmin all end up as an [`OptError`]. Errors raised by
//! model code travel through argmin boxed and are recovered unchanged.
use argmin::core::{ArgminError, Error};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The model has no analytic score; finite differences take over.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// A score component is NaN or infinite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost { value: f64 },

    // ---- Line search ----
    /// Every trial step along the search direction was infeasible.
    NoFeasibleStep { min_step: f64 },

    /// Initial step length must be finite and positive.
    InvalidStepLength { value: f64 },

    // ---- Model input ----
    /// Parameter vector length does not match the number of design columns.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter vector entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// argmin finished without a best parameter vector.
    MissingThetaHat,

    // ---- Argmin ----
    /// Error raised inside argmin itself; `kind` names the argmin variant.
    Backend { kind: &'static str, text: String },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    /// Hessian values need to be finite.
    InvalidHessian { row: usize, col: usize, value: f64 },

}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Model provides no analytic score")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Negative log-likelihood is not finite: {value}")
            }

            // ---- Line search ----
            OptError::NoFeasibleStep { min_step } => write!(
                f,
                "No feasible step along the search direction down to step length {min_step:e}"
            ),
            OptError::InvalidStepLength { value } => {
                write!(f, "Invalid initial step length {value}: must be finite and positive")
            }

            // ---- Model input ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Coefficient vector has length {actual}, design has {expected} columns")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Coefficient {index} is {value}: must be finite")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Optimizer returned no parameter estimate")
            }

            // ---- Argmin ----
            OptError::Backend { kind, text } => write!(f, "L-BFGS backend error ({kind}): {text}"),

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
        }
    }
}

/// Recover an [`OptError`] boxed by model code, else classify the argmin
/// failure.
impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let (kind, text) = match original_err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => ("invalid parameter", text),
            Ok(ArgminError::NotImplemented { text }) => ("not implemented", text),
            Ok(ArgminError::NotInitialized { text }) => ("not initialized", text),
            Ok(ArgminError::ConditionViolated { text }) => ("condition violated", text),
            Ok(ArgminError::CheckpointNotFound { text }) => ("checkpoint not found", text),
            Ok(ArgminError::PotentialBug { text }) => ("potential bug", text),
            Ok(ArgminError::ImpossibleError { text }) => ("impossible error", text),
            Ok(other) => ("unclassified", other.to_string()),
            Err(err) => ("other", err.to_string()),
        };
        OptError::Backend { kind, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` boxed into an argmin `Error` comes back out unchanged.
    fn opt_error_round_trips_through_argmin_error() {
        // Arrange
        let boxed: Error = OptError::NonFiniteCost { value: f64::NEG_INFINITY }.into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, OptError::NonFiniteCost { value: f64::NEG_INFINITY });
    }

    #[test]
    fn argmin_error_maps_to_named_variant() {
        let boxed: Error = ArgminError::InvalidParameter { text: "tol".to_string() }.into();
        assert_eq!(
            OptError::from(boxed),
            OptError::Backend { kind: "invalid parameter", text: "tol".to_string() }
        );
    }
}
