//! Synthetic data from known coefficients.
//!
//! Used by recovery tests and examples: draw a design, pick `β`, simulate
//! the response, fit, and compare. Every function takes the random stream
//! explicitly.
use crate::data::{
    ChoiceData, CountResponse, DesignMatrix,
    errors::{DataError, DataResult},
    response::group_rows,
};
use crate::optimization::numerical_stability::softmax;
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// `rows × cols` matrix of independent `U(low, high)` draws.
pub fn uniform_covariates<R: Rng + ?Sized>(
    rows: usize, cols: usize, low: f64, high: f64, rng: &mut R,
) -> Array2<f64> {
    Array2::from_shape_simple_fn((rows, cols), || low + (high - low) * rng.gen::<f64>())
}

/// Draw `yᵢ ~ Poisson(exp(xᵢ·β))` for every design row.
///
/// # Errors
/// - [`DataError::CoefficientLengthMismatch`] when `beta.len() != ncols`.
/// - [`DataError::InvalidSimulatedRate`] when a rate is zero, infinite or
///   NaN.
pub fn simulate_poisson_counts<R: Rng + ?Sized>(
    design: &DesignMatrix, beta: ArrayView1<'_, f64>, rng: &mut R,
) -> DataResult<CountResponse> {
    check_length(design, beta)?;
    let eta = design.linear_predictor(beta);
    let mut counts = Array1::<f64>::zeros(eta.len());
    for (row, (&e, y)) in eta.iter().zip(counts.iter_mut()).enumerate() {
        let rate = e.exp();
        if !(rate.is_finite() && rate > 0.0) {
            return Err(DataError::InvalidSimulatedRate { row, rate });
        }
        let dist =
            Poisson::new(rate).map_err(|_| DataError::InvalidSimulatedRate { row, rate })?;
        *y = dist.sample(rng);
    }
    CountResponse::new(counts)
}

/// Draw one chosen alternative per group from the MNL probabilities.
///
/// Rows sharing a key in `group_keys` form a choice set, exactly as in
/// [`ChoiceData::new`], which validates the result.
///
/// # Errors
/// - [`DataError::CoefficientLengthMismatch`] when `beta.len() != ncols`.
/// - [`DataError::RowCountMismatch`] when `group_keys.len() != nrows`.
/// - Any grouping error from [`ChoiceData::new`].
pub fn simulate_choices<R: Rng + ?Sized>(
    design: &DesignMatrix, group_keys: Vec<u64>, beta: ArrayView1<'_, f64>, rng: &mut R,
) -> DataResult<ChoiceData> {
    check_length(design, beta)?;
    if group_keys.len() != design.nrows() {
        return Err(DataError::RowCountMismatch {
            design_rows: design.nrows(),
            response_len: group_keys.len(),
        });
    }
    let utilities = design.linear_predictor(beta);
    let mut chosen = Array1::zeros(design.nrows());
    for (_, rows) in group_rows(&group_keys) {
        let group: Array1<f64> = rows.iter().map(|&r| utilities[r]).collect();
        let probs = softmax(group.view());
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut pick = rows.len() - 1;
        for (pos, &p) in probs.iter().enumerate() {
            cumulative += p;
            if u < cumulative {
                pick = pos;
                break;
            }
        }
        chosen[rows[pick]] = 1.0;
    }
    ChoiceData::new(chosen, group_keys)
}

/// Keys `0,0,…,1,1,…` for `groups` consecutive blocks of `alternatives` rows.
pub fn block_group_keys(groups: usize, alternatives: usize) -> Vec<u64> {
    (0..groups as u64).flat_map(|g| std::iter::repeat(g).take(alternatives)).collect()
}

fn check_length(design: &DesignMatrix, beta: ArrayView1<'_, f64>) -> DataResult<()> {
    if beta.len() != design.ncols() {
        return Err(DataError::CoefficientLengthMismatch {
            expected: design.ncols(),
            found: beta.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    // Purpose
    // -------
    // Simulated counts have the requested mean.
    //
    // Given
    // -----
    // - 5 000 intercept-only rows with β = ln 4.
    //
    // Expect
    // ------
    // - Sample mean within 0.15 of 4.
    fn poisson_counts_have_requested_mean() {
        // Arrange
        let design = DesignMatrix::from_unnamed(Array2::ones((5_000, 1))).unwrap();
        let mut rng = Pcg64::seed_from_u64(5);

        // Act
        let counts =
            simulate_poisson_counts(&design, array![4f64.ln()].view(), &mut rng).unwrap();

        // Assert
        assert!((counts.mean() - 4.0).abs() < 0.15, "mean = {}", counts.mean());
    }

    #[test]
    fn simulated_choices_form_valid_groups() {
        let mut rng = Pcg64::seed_from_u64(8);
        let design = DesignMatrix::from_unnamed(uniform_covariates(30, 2, -1.0, 1.0, &mut rng))
            .unwrap();
        let choices =
            simulate_choices(&design, block_group_keys(10, 3), array![1.0, -0.5].view(), &mut rng)
                .unwrap();
        assert_eq!(choices.n_groups(), 10);
        assert_eq!(choices.alternatives(), 3);
        assert!((choices.chosen().sum() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn coefficient_length_is_checked() {
        let design = DesignMatrix::from_unnamed(Array2::ones((3, 2))).unwrap();
        let mut rng = Pcg64::seed_from_u64(0);
        assert_eq!(
            simulate_poisson_counts(&design, array![0.0].view(), &mut rng).unwrap_err(),
            DataError::CoefficientLengthMismatch { expected: 2, found: 1 }
        );
        assert!(matches!(
            simulate_choices(&design, vec![0, 0], array![0.0, 0.0].view(), &mut rng),
            Err(DataError::RowCountMismatch { design_rows: 3, response_len: 2 })
        ));
    }
}
