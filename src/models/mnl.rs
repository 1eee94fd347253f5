//! models::mnl — grouped multinomial logit for discrete choice.
//!
//! Purpose
//! -------
//! Each choice-set group offers `J` alternatives with utilities
//! `uⱼ = xⱼ·β`; the probability of the chosen alternative is the softmax of
//! the group's utilities. This module provides the log-likelihood kernel,
//! per-row choice probabilities, the optimizer binding and the MLE fit. The
//! same kernel drives the Metropolis–Hastings sampler in [`crate::bayes`].
//!
//! Key behaviors
//! -------------
//! - [`mnl_log_likelihood`]: `Σ_g (u_chosen − logsumexp(u_g))`, with the
//!   per-group maximum subtracted before exponentiating.
//! - [`choice_probabilities`]: softmax within each group, written back in
//!   row order.
//! - [`MultinomialLogit`]: analytic score `Xᵀ(d − p)` where `d` is the chosen
//!   indicator and `p` the fitted probabilities. [`MultinomialLogit::fit`]
//!   gives the MLE, [`MultinomialLogit::sample`] a posterior chain.
//!
//! Invariants & assumptions
//! ------------------------
//! - Grouping was validated by [`ChoiceData`]: one chosen row per group,
//!   equal group sizes, at least two alternatives.
//! - Columns that are constant within every group (e.g. an intercept) are
//!   not identified and produce a singular information matrix.
use crate::bayes::{
    MetropolisOptions, NormalPrior, PosteriorChain, ProposalScales, run_metropolis,
};
use crate::data::{ChoiceData, ChoiceDataset, DesignMatrix};
use crate::inference::IntervalOptions;
use crate::models::{
    errors::EstimationResult,
    fit::{MleFit, fit_mle},
};
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, Grad, LogLikelihood, MLEOptions, Theta, validation::validate_theta_input,
    },
    numerical_stability::log_sum_exp,
};
use ndarray::{Array1, ArrayView1};

pub use crate::optimization::numerical_stability::softmax;

/// MNL log-likelihood at `beta`.
///
/// Returns `f64::NEG_INFINITY` if the utilities overflow to a non-finite
/// value. The caller guarantees `beta.len() == design.ncols()` and matching
/// row counts.
pub fn mnl_log_likelihood(
    beta: ArrayView1<'_, f64>, design: &DesignMatrix, choices: &ChoiceData,
) -> f64 {
    let utilities = design.linear_predictor(beta);
    let total: f64 = choices
        .sets()
        .iter()
        .map(|set| {
            let group: Array1<f64> = set.rows.iter().map(|&r| utilities[r]).collect();
            utilities[set.chosen] - log_sum_exp(group.view())
        })
        .sum();
    if total.is_finite() { total } else { f64::NEG_INFINITY }
}

/// Per-row choice probabilities; entries of each group sum to one.
pub fn choice_probabilities(
    beta: ArrayView1<'_, f64>, design: &DesignMatrix, choices: &ChoiceData,
) -> Array1<f64> {
    let utilities = design.linear_predictor(beta);
    let mut probs = Array1::zeros(utilities.len());
    for set in choices.sets() {
        let group: Array1<f64> = set.rows.iter().map(|&r| utilities[r]).collect();
        for (&row, &p) in set.rows.iter().zip(softmax(group.view()).iter()) {
            probs[row] = p;
        }
    }
    probs
}

/// Multinomial logit over grouped choice sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultinomialLogit;

impl MultinomialLogit {
    pub fn new() -> Self {
        Self
    }

    /// Zero utilities: every alternative equally likely.
    pub fn starting_values(&self, data: &ChoiceDataset) -> Theta {
        Array1::zeros(data.design.ncols())
    }

    /// Maximum-likelihood fit with observed-information standard errors.
    ///
    /// # Errors
    /// See [`fit_mle`].
    pub fn fit(
        &self, data: &ChoiceDataset, theta0: Theta, opts: &MLEOptions, interval: &IntervalOptions,
    ) -> EstimationResult<MleFit> {
        let fit = fit_mle(self, theta0, data, data.design.names(), opts, interval)?;
        log::debug!(
            "mnl fit on {} groups of {} alternatives: loglik = {:.6}",
            data.choices.n_groups(),
            data.choices.alternatives(),
            fit.log_likelihood()
        );
        Ok(fit)
    }

    /// Posterior draws by random-walk Metropolis–Hastings.
    ///
    /// # Errors
    /// [`EstimationError::Sampler`](crate::models::EstimationError::Sampler)
    /// for invalid options, mismatched prior/proposal dimensions or a
    /// starting value with zero posterior density.
    pub fn sample(
        &self, data: &ChoiceDataset, prior: &NormalPrior, proposal: &ProposalScales,
        initial: Theta, options: &MetropolisOptions,
    ) -> EstimationResult<PosteriorChain> {
        Ok(run_metropolis(self, data, prior, proposal, initial, options)?)
    }
}

impl LogLikelihood for MultinomialLogit {
    type Data = ChoiceDataset;

    fn value(&self, theta: &Theta, data: &ChoiceDataset) -> OptResult<Cost> {
        Ok(mnl_log_likelihood(theta.view(), &data.design, &data.choices))
    }

    fn check(&self, theta: &Theta, data: &ChoiceDataset) -> OptResult<()> {
        validate_theta_input(theta, data.design.ncols())
    }

    /// Score `Σ_g (x_chosen − Σⱼ pⱼ xⱼ) = Xᵀ(d − p)`.
    fn grad(&self, theta: &Theta, data: &ChoiceDataset) -> OptResult<Grad> {
        let probs = choice_probabilities(theta.view(), &data.design, &data.choices);
        if let Some((index, &value)) = probs.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Choice probability is not finite.",
            });
        }
        let residual = &data.choices.chosen() - &probs;
        Ok(data.design.values().t().dot(&residual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // Scope
    // -----
    // - Softmax within groups, including interleaved group keys.
    // - Kernel value against a hand computation.
    // - Analytic score against finite differences.

    fn two_attribute_dataset() -> ChoiceDataset {
        let design = DesignMatrix::new(
            array![
                [1.0, 0.2],
                [0.0, 1.5],
                [0.5, -0.7],
                [0.3, 0.0],
                [1.2, 0.4],
                [-0.4, 1.0],
            ],
            vec!["quality".to_string(), "price".to_string()],
        )
        .unwrap();
        let choices = ChoiceData::from_blocks(&[0, 2], 3).unwrap();
        ChoiceDataset::new(design, choices).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A single group reproduces the plain softmax and its log-probability.
    //
    // Given
    // -----
    // - Utilities [2.0, 0.5, 0.1] via a one-column design and β = 1; the
    //   first alternative is chosen.
    //
    // Expect
    // ------
    // - Probabilities ≈ [0.7285, 0.1625, 0.1090]; ℓ = ln p₀.
    fn single_group_matches_softmax() {
        // Arrange
        let design = DesignMatrix::from_unnamed(array![[2.0], [0.5], [0.1]]).unwrap();
        let choices = ChoiceData::from_blocks(&[0], 3).unwrap();
        let beta = array![1.0];

        // Act
        let probs = choice_probabilities(beta.view(), &design, &choices);
        let ll = mnl_log_likelihood(beta.view(), &design, &choices);

        // Assert
        let expected = [0.728_491_942, 0.162_548_524, 0.108_959_534];
        for (p, e) in probs.iter().zip(expected) {
            assert!((p - e).abs() < 1e-8, "{p} vs {e}");
        }
        assert!((ll - probs[0].ln()).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Probabilities sum to one within every group, whatever the row order.
    //
    // Given
    // -----
    // - Three groups of two rows with interleaved keys [7, 9, 7, 3, 9, 3].
    //
    // Expect
    // ------
    // - Each group's probabilities sum to 1 within 1e-9.
    fn probabilities_sum_to_one_per_group() {
        // Arrange
        let design = DesignMatrix::from_unnamed(array![
            [0.3, 1.0],
            [2.0, -1.0],
            [-0.5, 0.2],
            [1.1, 0.0],
            [0.0, 0.0],
            [4.0, 3.0],
        ])
        .unwrap();
        let choices =
            ChoiceData::new(array![1.0, 0.0, 0.0, 0.0, 1.0, 1.0], vec![7, 9, 7, 3, 9, 3]).unwrap();
        let beta = array![0.8, -1.3];

        // Act
        let probs = choice_probabilities(beta.view(), &design, &choices);

        // Assert
        for set in choices.sets() {
            let total: f64 = set.rows.iter().map(|&r| probs[r]).sum();
            assert!((total - 1.0).abs() < 1e-9, "group {} sums to {total}", set.key);
        }
    }

    #[test]
    fn zero_utilities_give_uniform_choice() {
        let data = two_attribute_dataset();
        let beta = Array1::zeros(2);
        let ll = mnl_log_likelihood(beta.view(), &data.design, &data.choices);
        assert!((ll - 2.0 * (1.0f64 / 3.0).ln()).abs() < 1e-12);
        let probs = choice_probabilities(beta.view(), &data.design, &data.choices);
        assert!(probs.iter().all(|&p| (p - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // Large utilities stay finite thanks to the max shift.
    //
    // Given
    // -----
    // - Utilities of order 1e3 (exp would overflow without shifting).
    //
    // Expect
    // ------
    // - Finite log-likelihood, probabilities summing to 1.
    fn large_utilities_remain_finite() {
        // Arrange
        let data = two_attribute_dataset();
        let beta = array![1000.0, 500.0];

        // Act
        let ll = mnl_log_likelihood(beta.view(), &data.design, &data.choices);
        let probs = choice_probabilities(beta.view(), &data.design, &data.choices);

        // Assert
        assert!(ll.is_finite());
        assert!(ll <= 0.0);
        assert!((probs.sum() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn score_matches_central_difference() {
        let data = two_attribute_dataset();
        let model = MultinomialLogit::new();
        let beta = array![0.4, -0.9];
        let grad = model.grad(&beta, &data).unwrap();
        let h = 1e-6;
        for j in 0..2 {
            let mut up = beta.clone();
            let mut down = beta.clone();
            up[j] += h;
            down[j] -= h;
            let fd = (model.value(&up, &data).unwrap() - model.value(&down, &data).unwrap())
                / (2.0 * h);
            assert!((grad[j] - fd).abs() < 1e-6, "component {j}: {} vs {fd}", grad[j]);
        }
    }

    #[test]
    // Purpose
    // -------
    // An intercept constant within groups is unidentified and the fit fails
    // at the covariance step, not in the optimizer.
    //
    // Given
    // -----
    // - A design with an all-ones column next to a varying attribute.
    //
    // Expect
    // ------
    // - `EstimationError::Inference(SingularHessian { .. })`.
    fn within_group_constant_column_is_singular() {
        // Arrange
        let x = array![0.3, -0.2, 1.0, 0.8, -1.1, 0.4, 0.0, 0.9, -0.5, 1.3, 0.2, -0.8];
        let mut values = Array2::ones((12, 2));
        values.column_mut(1).assign(&x);
        let design =
            DesignMatrix::new(values, vec!["const".to_string(), "x".to_string()]).unwrap();
        let choices = ChoiceData::from_blocks(&[0, 1, 2, 2], 3).unwrap();
        let data = ChoiceDataset::new(design, choices).unwrap();
        let model = MultinomialLogit::new();

        // Act
        let result = model.fit(
            &data,
            model.starting_values(&data),
            &MLEOptions::default(),
            &IntervalOptions::default(),
        );

        // Assert
        assert!(
            matches!(
                result,
                Err(crate::models::EstimationError::Inference(
                    crate::inference::InferenceError::SingularHessian { .. }
                ))
            ),
            "got {result:?}"
        );
    }
}
