use crate::optimization::errors::OptError;

pub type SamplerResult<T> = Result<T, SamplerError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SamplerError {
    // ---- MetropolisOptions ----
    /// Chain length must be positive.
    InvalidSteps { steps: usize },

    /// Burn-in must leave at least one retained draw.
    InvalidBurnIn { burn_in: usize, steps: usize },

    // ---- Proposal ----
    /// One proposal scale per parameter.
    ProposalDimMismatch { expected: usize, found: usize },

    /// Proposal scales must be finite and strictly positive.
    InvalidProposalScale { index: usize, value: f64 },

    // ---- Prior ----
    /// One prior mean/variance per parameter.
    PriorDimMismatch { expected: usize, found: usize },

    /// Prior variances must be finite and strictly positive.
    InvalidPriorVariance { index: usize, value: f64 },

    /// Prior means must be finite.
    InvalidPriorMean { index: usize, value: f64 },

    // ---- Chain ----
    /// Starting value rejected by the model's input check.
    InitialValue(OptError),

    /// The chain cannot start where the posterior vanishes.
    NonFiniteInitialPosterior { value: f64 },

    // ---- Summary ----
    /// Summaries need at least one retained draw.
    EmptyRetainedChain { steps: usize, burn_in: usize },

    /// One name per parameter.
    NameCountMismatch { expected: usize, found: usize },

    /// Credible level must lie in (0, 1).
    InvalidCredibleLevel { level: f64 },
}

impl std::error::Error for SamplerError {}

impl std::fmt::Display for SamplerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- MetropolisOptions ----
            SamplerError::InvalidSteps { steps } => {
                write!(f, "Invalid number of steps {steps}: must be positive")
            }
            SamplerError::InvalidBurnIn { burn_in, steps } => {
                write!(f, "Burn-in ({burn_in}) must be smaller than the number of steps ({steps})")
            }

            // ---- Proposal ----
            SamplerError::ProposalDimMismatch { expected, found } => write!(
                f,
                "Proposal scale dimension mismatch: expected {expected}, found {found}"
            ),
            SamplerError::InvalidProposalScale { index, value } => write!(
                f,
                "Invalid proposal scale at index {index}: {value}: must be finite and positive"
            ),

            // ---- Prior ----
            SamplerError::PriorDimMismatch { expected, found } => {
                write!(f, "Prior dimension mismatch: expected {expected}, found {found}")
            }
            SamplerError::InvalidPriorVariance { index, value } => write!(
                f,
                "Invalid prior variance at index {index}: {value}: must be finite and positive"
            ),
            SamplerError::InvalidPriorMean { index, value } => {
                write!(f, "Invalid prior mean at index {index}: {value}: must be finite")
            }

            // ---- Chain ----
            SamplerError::InitialValue(err) => write!(f, "Invalid initial value: {err}"),
            SamplerError::NonFiniteInitialPosterior { value } => {
                write!(f, "Log-posterior at the initial value is {value}: density must be positive")
            }

            // ---- Summary ----
            SamplerError::EmptyRetainedChain { steps, burn_in } => write!(
                f,
                "No retained draws: burn-in {burn_in} removes all {steps} steps"
            ),
            SamplerError::NameCountMismatch { expected, found } => {
                write!(f, "Parameter name count mismatch: expected {expected}, found {found}")
            }
            SamplerError::InvalidCredibleLevel { level } => {
                write!(f, "Invalid credible level {level}: must lie strictly between 0 and 1")
            }
        }
    }
}

impl From<OptError> for SamplerError {
    fn from(err: OptError) -> Self {
        SamplerError::InitialValue(err)
    }
}
