//! Preallocated storage for one Metropolis–Hastings run.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// Every state visited by the sampler, one row per step.
///
/// Rows `0..burn_in` are kept for inspection but excluded from
/// [`retained`](PosteriorChain::retained) and from all summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorChain {
    draws: Array2<f64>,
    log_posterior: Array1<f64>,
    accepted: Vec<bool>,
    burn_in: usize,
}

impl PosteriorChain {
    /// Allocate storage for `steps` states of dimension `dim`.
    pub(crate) fn with_capacity(steps: usize, dim: usize, burn_in: usize) -> Self {
        Self {
            draws: Array2::zeros((steps, dim)),
            log_posterior: Array1::zeros(steps),
            accepted: vec![false; steps],
            burn_in,
        }
    }

    /// Write the state held after `step`.
    pub(crate) fn record(
        &mut self, step: usize, state: ArrayView1<'_, f64>, log_posterior: f64, accepted: bool,
    ) {
        self.draws.row_mut(step).assign(&state);
        self.log_posterior[step] = log_posterior;
        self.accepted[step] = accepted;
    }

    pub fn steps(&self) -> usize {
        self.draws.nrows()
    }

    pub fn dim(&self) -> usize {
        self.draws.ncols()
    }

    pub fn burn_in(&self) -> usize {
        self.burn_in
    }

    /// All `steps × dim` states, burn-in included.
    pub fn draws(&self) -> ArrayView2<'_, f64> {
        self.draws.view()
    }

    /// Post-burn-in states.
    pub fn retained(&self) -> ArrayView2<'_, f64> {
        self.draws.slice(s![self.burn_in.., ..])
    }

    pub fn retained_len(&self) -> usize {
        self.steps().saturating_sub(self.burn_in)
    }

    /// Log-posterior of the state held after each step.
    pub fn log_posterior(&self) -> ArrayView1<'_, f64> {
        self.log_posterior.view()
    }

    pub fn accepted(&self) -> &[bool] {
        &self.accepted
    }

    /// Fraction of accepted proposals over the whole run.
    pub fn acceptance_rate(&self) -> f64 {
        if self.accepted.is_empty() {
            return 0.0;
        }
        self.accepted.iter().filter(|&&a| a).count() as f64 / self.accepted.len() as f64
    }

    /// Final state of the chain.
    pub fn last(&self) -> Option<ArrayView1<'_, f64>> {
        self.steps().checked_sub(1).map(|i| self.draws.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn retained_excludes_burn_in_rows() {
        let mut chain = PosteriorChain::with_capacity(4, 2, 1);
        for step in 0..4 {
            let v = step as f64;
            chain.record(step, array![v, -v].view(), -v, step % 2 == 1);
        }
        assert_eq!(chain.retained(), array![[1.0, -1.0], [2.0, -2.0], [3.0, -3.0]]);
        assert_eq!(chain.retained_len(), 3);
        assert!((chain.acceptance_rate() - 0.5).abs() < 1e-12);
        assert_eq!(chain.last().unwrap(), array![3.0, -3.0]);
    }
}
