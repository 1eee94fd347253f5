//! bayes::sampler — random-walk Metropolis–Hastings over a coefficient
//! vector.
//!
//! Purpose
//! -------
//! Draw from `p(β | data) ∝ L(β) · p(β)` for any
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood),
//! in practice the multinomial logit.
//!
//! Key behaviors
//! -------------
//! - Proposal `β' = β + ε`, `εⱼ ~ N(0, σⱼ²)` with per-coordinate
//!   [`ProposalScales`]. The proposal is symmetric, so the acceptance ratio
//!   is the posterior ratio alone.
//! - Accept when `ln U < ln p(β' | data) − ln p(β | data)`, `U ~ U(0, 1)`.
//!   Proposals whose log-posterior is non-finite, or whose evaluation fails,
//!   are rejected.
//! - Every step records the current state (new or repeated), so the chain
//!   has exactly `steps` rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - The RNG stream is owned by the run: [`run_metropolis`] seeds a
//!   `Pcg64` from [`MetropolisOptions::seed`]; [`run_metropolis_with_rng`]
//!   takes a caller-owned generator. Each step consumes exactly `k` normal
//!   draws and one uniform, so equal seeds give bit-identical chains.
//! - The starting value must have a finite log-posterior.
//!
//! Conventions
//! -----------
//! - No adaptation: proposal scales are fixed for the whole run, which keeps
//!   the chain a proper Markov chain from the first step.
use crate::bayes::{
    chain::PosteriorChain,
    errors::{SamplerError, SamplerResult},
    priors::NormalPrior,
};
use crate::data::DesignMatrix;
use crate::optimization::loglik_optimizer::{LogLikelihood, Theta};
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg64;

/// Acceptance rates outside this band trigger a warning.
const HEALTHY_ACCEPTANCE: (f64, f64) = (0.1, 0.6);

/// Run length, burn-in and seed.
///
/// Defaults: 20 000 steps, 5 000 burn-in, seed 42.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetropolisOptions {
    pub steps: usize,
    pub burn_in: usize,
    pub seed: u64,
}

impl MetropolisOptions {
    /// # Errors
    /// See [`MetropolisOptions::validate`].
    pub fn new(steps: usize, burn_in: usize, seed: u64) -> SamplerResult<Self> {
        let opts = Self { steps, burn_in, seed };
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// - [`SamplerError::InvalidSteps`] when `steps == 0`.
    /// - [`SamplerError::InvalidBurnIn`] unless `burn_in < steps`.
    pub fn validate(&self) -> SamplerResult<()> {
        if self.steps == 0 {
            return Err(SamplerError::InvalidSteps { steps: self.steps });
        }
        if self.burn_in >= self.steps {
            return Err(SamplerError::InvalidBurnIn { burn_in: self.burn_in, steps: self.steps });
        }
        Ok(())
    }

    pub fn retained(&self) -> usize {
        self.steps.saturating_sub(self.burn_in)
    }
}

impl Default for MetropolisOptions {
    fn default() -> Self {
        Self { steps: 20_000, burn_in: 5_000, seed: 42 }
    }
}

/// Per-coordinate random-walk standard deviations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalScales {
    scales: Array1<f64>,
}

impl ProposalScales {
    /// # Errors
    /// [`SamplerError::InvalidProposalScale`] for a non-positive or
    /// non-finite entry.
    pub fn new(scales: Array1<f64>) -> SamplerResult<Self> {
        if let Some((index, &value)) =
            scales.iter().enumerate().find(|(_, s)| !(s.is_finite() && **s > 0.0))
        {
            return Err(SamplerError::InvalidProposalScale { index, value });
        }
        Ok(Self { scales })
    }

    /// The same `scale` on every coordinate.
    ///
    /// # Errors
    /// As [`ProposalScales::new`].
    pub fn uniform(dim: usize, scale: f64) -> SamplerResult<Self> {
        Self::new(Array1::from_elem(dim, scale))
    }

    /// `price_scale` on the design's price column, `preference_scale`
    /// elsewhere.
    ///
    /// # Errors
    /// As [`ProposalScales::new`].
    pub fn from_blocks(
        design: &DesignMatrix, preference_scale: f64, price_scale: f64,
    ) -> SamplerResult<Self> {
        let mut scales = Array1::from_elem(design.ncols(), preference_scale);
        if let Some(price) = design.roles().price {
            scales[price] = price_scale;
        }
        Self::new(scales)
    }

    pub fn dim(&self) -> usize {
        self.scales.len()
    }

    pub fn scales(&self) -> &Array1<f64> {
        &self.scales
    }
}

/// `min(1, exp(log_ratio))`; `NaN` maps to 0.
pub fn acceptance_probability(log_ratio: f64) -> f64 {
    if log_ratio.is_nan() { 0.0 } else { log_ratio.min(0.0).exp() }
}

/// Run a chain seeded from `options.seed`.
///
/// # Errors
/// See [`run_metropolis_with_rng`].
pub fn run_metropolis<M: LogLikelihood>(
    model: &M, data: &M::Data, prior: &NormalPrior, proposal: &ProposalScales, initial: Theta,
    options: &MetropolisOptions,
) -> SamplerResult<PosteriorChain> {
    let mut rng = Pcg64::seed_from_u64(options.seed);
    run_metropolis_with_rng(model, data, prior, proposal, initial, options, &mut rng)
}

/// Run a chain drawing from a caller-owned generator.
///
/// `options.seed` is ignored here.
///
/// # Errors
/// - Configuration errors from [`MetropolisOptions::validate`].
/// - [`SamplerError::ProposalDimMismatch`] / [`SamplerError::PriorDimMismatch`]
///   when proposal or prior length differs from `initial`.
/// - [`SamplerError::InitialValue`] when the model rejects `initial`.
/// - [`SamplerError::NonFiniteInitialPosterior`] when `initial` has zero
///   posterior density.
pub fn run_metropolis_with_rng<M: LogLikelihood, R: Rng + ?Sized>(
    model: &M, data: &M::Data, prior: &NormalPrior, proposal: &ProposalScales, initial: Theta,
    options: &MetropolisOptions, rng: &mut R,
) -> SamplerResult<PosteriorChain> {
    options.validate()?;
    let dim = initial.len();
    if proposal.dim() != dim {
        return Err(SamplerError::ProposalDimMismatch { expected: dim, found: proposal.dim() });
    }
    if prior.dim() != dim {
        return Err(SamplerError::PriorDimMismatch { expected: dim, found: prior.dim() });
    }
    model.check(&initial, data)?;

    let log_posterior = |theta: &Theta| -> f64 {
        match model.value(theta, data) {
            Ok(loglik) => loglik + prior.log_density(theta.view()),
            Err(_) => f64::NEG_INFINITY,
        }
    };

    let mut current = initial;
    let mut current_lp = log_posterior(&current);
    if !current_lp.is_finite() {
        return Err(SamplerError::NonFiniteInitialPosterior { value: current_lp });
    }

    let scales = proposal.scales();
    let mut chain = PosteriorChain::with_capacity(options.steps, dim, options.burn_in);
    let mut candidate = Array1::zeros(dim);
    for step in 0..options.steps {
        random_walk_into(&mut candidate, &current, scales, rng);
        let u: f64 = rng.gen();
        let candidate_lp = log_posterior(&candidate);
        let accepted = candidate_lp.is_finite() && should_accept(candidate_lp - current_lp, u);
        if accepted {
            current.assign(&candidate);
            current_lp = candidate_lp;
        }
        chain.record(step, current.view(), current_lp, accepted);
    }

    let rate = chain.acceptance_rate();
    log::debug!(
        "metropolis finished: {} steps ({} burn-in), acceptance rate {rate:.3}",
        options.steps,
        options.burn_in
    );
    if rate < HEALTHY_ACCEPTANCE.0 || rate > HEALTHY_ACCEPTANCE.1 {
        log::warn!(
            "metropolis acceptance rate {rate:.3} is outside [{}, {}]; rescale the proposal",
            HEALTHY_ACCEPTANCE.0,
            HEALTHY_ACCEPTANCE.1
        );
    }
    Ok(chain)
}

// ---- Helper methods ----

fn random_walk_into<R: Rng + ?Sized>(
    out: &mut Array1<f64>, current: &Theta, scales: &Array1<f64>, rng: &mut R,
) {
    for ((o, &c), &s) in out.iter_mut().zip(current.iter()).zip(scales.iter()) {
        let z: f64 = rng.sample(StandardNormal);
        *o = c + s * z;
    }
}

fn should_accept(log_ratio: f64, u: f64) -> bool {
    log_ratio >= 0.0 || u.ln() < log_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::{OptError, OptResult};
    use crate::optimization::loglik_optimizer::{Cost, validation::validate_theta_input};
    use ndarray::array;

    // Scope
    // -----
    // - Acceptance probability saturation.
    // - Configuration validation.
    // - Sampling a known Gaussian target and seed reproducibility.

    // ℓ(θ) = -½ Σ (θⱼ - cⱼ)², i.e. a N(c, I) likelihood.
    struct Gaussian {
        center: Array1<f64>,
    }

    impl LogLikelihood for Gaussian {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            Ok(-0.5 * (theta - &self.center).mapv(|d| d * d).sum())
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            validate_theta_input(theta, self.center.len())
        }
    }

    // Zero density for θ₀ < 0.
    struct HalfLine;

    impl LogLikelihood for HalfLine {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            if theta[0] < 0.0 {
                Err(OptError::NonFiniteCost { value: f64::NEG_INFINITY })
            } else {
                Ok(-theta[0])
            }
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            validate_theta_input(theta, 1)
        }
    }

    #[test]
    // Purpose
    // -------
    // The acceptance probability lives in [0, 1] and saturates.
    //
    // Given
    // -----
    // - Log ratios from −∞ to +∞, plus NaN.
    //
    // Expect
    // ------
    // - 0 at −∞ and NaN, 1 for any non-negative ratio, e⁻¹ at −1.
    fn acceptance_probability_saturates() {
        // Arrange
        let ratios = [f64::NEG_INFINITY, -1e6, -1.0, 0.0, 2.0, 1e6, f64::INFINITY];

        // Act
        let probs: Vec<f64> = ratios.iter().map(|&r| acceptance_probability(r)).collect();

        // Assert
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert_eq!(probs[0], 0.0);
        assert!((probs[2] - (-1.0f64).exp()).abs() < 1e-15);
        assert_eq!(&probs[3..], &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(acceptance_probability(f64::NAN), 0.0);
    }

    #[test]
    fn options_and_scales_are_validated() {
        assert_eq!(
            MetropolisOptions::new(100, 100, 1).unwrap_err(),
            SamplerError::InvalidBurnIn { burn_in: 100, steps: 100 }
        );
        assert_eq!(
            MetropolisOptions::new(0, 0, 1).unwrap_err(),
            SamplerError::InvalidSteps { steps: 0 }
        );
        assert!(MetropolisOptions::default().validate().is_ok());
        assert!(matches!(
            ProposalScales::new(array![0.1, -0.2]),
            Err(SamplerError::InvalidProposalScale { index: 1, .. })
        ));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let model = Gaussian { center: array![0.0, 0.0] };
        let prior = NormalPrior::diffuse(2).unwrap();
        let options = MetropolisOptions::new(10, 1, 0).unwrap();
        let err = run_metropolis(
            &model,
            &(),
            &prior,
            &ProposalScales::uniform(3, 0.5).unwrap(),
            array![0.0, 0.0],
            &options,
        )
        .unwrap_err();
        assert_eq!(err, SamplerError::ProposalDimMismatch { expected: 2, found: 3 });
    }

    #[test]
    // Purpose
    // -------
    // The chain targets the posterior: with a flat-ish prior on a N(c, I)
    // likelihood the retained mean is close to c.
    //
    // Given
    // -----
    // - c = (1, −2), proposal sd 1.0, 20 000 steps, 2 000 burn-in.
    //
    // Expect
    // ------
    // - Retained means within 0.15 of c; acceptance rate in (0.2, 0.8).
    fn chain_recovers_gaussian_center() {
        // Arrange
        let model = Gaussian { center: array![1.0, -2.0] };
        let prior = NormalPrior::diffuse(2).unwrap();
        let proposal = ProposalScales::uniform(2, 1.0).unwrap();
        let options = MetropolisOptions::new(20_000, 2_000, 7).unwrap();

        // Act
        let chain =
            run_metropolis(&model, &(), &prior, &proposal, array![0.0, 0.0], &options).unwrap();

        // Assert
        let means = chain.retained().mean_axis(ndarray::Axis(0)).unwrap();
        assert!((means[0] - 1.0).abs() < 0.15, "mean[0] = {}", means[0]);
        assert!((means[1] + 2.0).abs() < 0.15, "mean[1] = {}", means[1]);
        let rate = chain.acceptance_rate();
        assert!(rate > 0.2 && rate < 0.8, "acceptance rate {rate}");
        assert_eq!(chain.steps(), 20_000);
    }

    #[test]
    // Purpose
    // -------
    // Proposals in a zero-density region are rejected without error, and
    // the chain never leaves the support.
    //
    // Given
    // -----
    // - Exponential target on θ ≥ 0 started at 0.1 with a wide proposal.
    //
    // Expect
    // ------
    // - Every recorded state is non-negative and some proposals are rejected.
    fn infeasible_proposals_are_rejected() {
        // Arrange
        let prior = NormalPrior::diffuse(1).unwrap();
        let proposal = ProposalScales::uniform(1, 2.0).unwrap();
        let options = MetropolisOptions::new(2_000, 100, 3).unwrap();

        // Act
        let chain = run_metropolis(&HalfLine, &(), &prior, &proposal, array![0.1], &options)
            .unwrap();

        // Assert
        assert!(chain.draws().iter().all(|&b| b >= 0.0));
        assert!(chain.accepted().iter().any(|&a| !a));
        assert!(chain.log_posterior().iter().all(|lp| lp.is_finite()));
    }

    #[test]
    fn zero_density_start_is_an_error() {
        let prior = NormalPrior::diffuse(1).unwrap();
        let proposal = ProposalScales::uniform(1, 1.0).unwrap();
        let err = run_metropolis(
            &HalfLine,
            &(),
            &prior,
            &proposal,
            array![-1.0],
            &MetropolisOptions::new(10, 0, 0).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, SamplerError::NonFiniteInitialPosterior { .. }));
    }

    #[test]
    fn same_seed_gives_identical_chains() {
        let model = Gaussian { center: array![0.5] };
        let prior = NormalPrior::zero_mean(1, 4.0).unwrap();
        let proposal = ProposalScales::uniform(1, 0.8).unwrap();
        let options = MetropolisOptions::new(500, 50, 11).unwrap();
        let a = run_metropolis(&model, &(), &prior, &proposal, array![0.0], &options).unwrap();
        let b = run_metropolis(&model, &(), &prior, &proposal, array![0.0], &options).unwrap();
        let c = run_metropolis(
            &model,
            &(),
            &prior,
            &proposal,
            array![0.0],
            &MetropolisOptions { seed: 12, ..options },
        )
        .unwrap();
        assert_eq!(a, b);
        assert_ne!(a.draws(), c.draws());
    }
}
