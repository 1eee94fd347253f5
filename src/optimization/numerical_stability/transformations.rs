//! Overflow-safe exponential transforms.
//!
//! # Provided items
//! - [`MAX_LINEAR_PREDICTOR`]: largest linear predictor a Poisson rate may
//!   take before the point is treated as infeasible.
//! - [`log_sum_exp`]: `ln Σ exp(uⱼ)` with the maximum shifted out.
//! - [`softmax`]: max-shifted softmax of a utility vector.
//!
//! Inputs are assumed finite; callers validate before reaching here.
use ndarray::{Array1, ArrayView1};

/// Upper bound on `η = x·β` for a Poisson rate `exp(η)`.
///
/// `exp(709.78)` is the largest finite `f64`; 700 leaves room for the
/// products and sums taken after exponentiating.
pub const MAX_LINEAR_PREDICTOR: f64 = 700.0;

/// `ln Σⱼ exp(uⱼ)`, computed as `m + ln Σⱼ exp(uⱼ - m)` with `m = max u`.
///
/// Returns `-∞` for an empty input.
pub fn log_sum_exp(utilities: ArrayView1<'_, f64>) -> f64 {
    let max = utilities.fold(f64::NEG_INFINITY, |acc, &u| acc.max(u));
    if !max.is_finite() {
        return max;
    }
    max + utilities.iter().map(|&u| (u - max).exp()).sum::<f64>().ln()
}

/// Softmax of `utilities`; entries are positive and sum to one.
///
/// The maximum is subtracted before exponentiating, so arbitrarily large
/// utilities do not overflow.
pub fn softmax(utilities: ArrayView1<'_, f64>) -> Array1<f64> {
    let lse = log_sum_exp(utilities);
    utilities.mapv(|u| (u - lse).exp())
}
