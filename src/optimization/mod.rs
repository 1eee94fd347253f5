//! optimization — likelihood maximization, overflow guards and the
//! optimizer error surface.
//!
//! - [`loglik_optimizer`]: the L-BFGS driver behind every `fit`.
//! - [`numerical_stability`]: `MAX_LINEAR_PREDICTOR`, log-sum-exp, softmax.
//! - [`errors`]: [`OptError`](errors::OptError) and `OptResult<T>`; argmin
//!   errors never cross this module's boundary unconverted.
//!
//! All solvers maximize `ℓ(β)` by minimizing `-ℓ(β)`; user-facing values
//! are always log-likelihoods.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
