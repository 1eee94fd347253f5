//! Posterior summaries from the retained part of a chain.
//!
//! Credible intervals are equal-tailed and use linearly interpolated
//! empirical quantiles of the retained draws.
use crate::bayes::{
    chain::PosteriorChain,
    diagnostics::{effective_sample_size, geweke_z, mean, variance},
    errors::{SamplerError, SamplerResult},
};
use std::fmt;

/// Summary of one coefficient's marginal posterior.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub lower: f64,
    pub upper: f64,
    pub ess: f64,
    pub geweke_z: f64,
}

/// Per-coefficient summaries plus chain-level diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorSummary {
    pub rows: Vec<ParameterSummary>,
    pub retained_draws: usize,
    pub acceptance_rate: f64,
    pub level: f64,
}

impl PosteriorSummary {
    pub fn get(&self, name: &str) -> Option<&ParameterSummary> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn means(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.mean).collect()
    }
}

impl fmt::Display for PosteriorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = 100.0 * self.level;
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>12} {:>12} {:>9} {:>8}",
            "coef", "mean", "sd", format!("lo{pct:.0}%"), format!("hi{pct:.0}%"), "ess", "geweke"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<16} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>9.1} {:>8.3}",
                row.name, row.mean, row.std_dev, row.lower, row.upper, row.ess, row.geweke_z
            )?;
        }
        write!(
            f,
            "retained draws: {}, acceptance rate: {:.3}",
            self.retained_draws, self.acceptance_rate
        )
    }
}

/// Summarize the post-burn-in draws of `chain`.
///
/// # Errors
/// - [`SamplerError::InvalidCredibleLevel`] unless `0 < level < 1`.
/// - [`SamplerError::NameCountMismatch`] when `names.len() != chain.dim()`.
/// - [`SamplerError::EmptyRetainedChain`] when burn-in covers the chain.
pub fn summarize_chain(
    chain: &PosteriorChain, names: &[String], level: f64,
) -> SamplerResult<PosteriorSummary> {
    if !(level > 0.0 && level < 1.0) {
        return Err(SamplerError::InvalidCredibleLevel { level });
    }
    if names.len() != chain.dim() {
        return Err(SamplerError::NameCountMismatch { expected: chain.dim(), found: names.len() });
    }
    if chain.retained_len() == 0 {
        return Err(SamplerError::EmptyRetainedChain {
            steps: chain.steps(),
            burn_in: chain.burn_in(),
        });
    }

    let tail = 0.5 * (1.0 - level);
    let retained = chain.retained();
    let rows = names
        .iter()
        .zip(retained.columns())
        .map(|(name, column)| {
            let trace: Vec<f64> = column.to_vec();
            let mut sorted = trace.clone();
            sorted.sort_by(f64::total_cmp);
            ParameterSummary {
                name: name.clone(),
                mean: mean(&trace),
                std_dev: variance(&trace).sqrt(),
                lower: percentile(&sorted, tail),
                upper: percentile(&sorted, 1.0 - tail),
                ess: effective_sample_size(&trace),
                geweke_z: geweke_z(&trace),
            }
        })
        .collect();

    Ok(PosteriorSummary {
        rows,
        retained_draws: chain.retained_len(),
        acceptance_rate: chain.acceptance_rate(),
        level,
    })
}

/// Linearly interpolated quantile of ascending `sorted_values`.
pub fn percentile(sorted_values: &[f64], probability: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = probability.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = position - lower as f64;
        (1.0 - weight) * sorted_values[lower] + weight * sorted_values[upper]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn chain_from(rows: &[[f64; 2]], burn_in: usize) -> PosteriorChain {
        let mut chain = PosteriorChain::with_capacity(rows.len(), 2, burn_in);
        for (step, row) in rows.iter().enumerate() {
            chain.record(step, array![row[0], row[1]].view(), 0.0, step % 2 == 0);
        }
        chain
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert!((percentile(&sorted, 0.1) - 1.4).abs() < 1e-12);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Summaries use post-burn-in rows only.
    //
    // Given
    // -----
    // - Two burn-in rows at 100, then draws 1..=5 for both coefficients.
    //
    // Expect
    // ------
    // - mean 3, sd √2.5, 80% interval [1.4, 4.6], 5 retained draws.
    fn summary_ignores_burn_in() {
        // Arrange
        let mut rows = vec![[100.0, 100.0]; 2];
        rows.extend((1..=5).map(|i| [i as f64, i as f64]));
        let chain = chain_from(&rows, 2);
        let names = vec!["a".to_string(), "b".to_string()];

        // Act
        let summary = summarize_chain(&chain, &names, 0.8).unwrap();

        // Assert
        let a = summary.get("a").unwrap();
        assert!((a.mean - 3.0).abs() < 1e-12);
        assert!((a.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert!((a.lower - 1.4).abs() < 1e-12);
        assert!((a.upper - 4.6).abs() < 1e-12);
        assert_eq!(summary.retained_draws, 5);
        assert!(summary.to_string().contains("lo80%"));
    }

    #[test]
    // Purpose
    // -------
    // Lookup by name and the mean vector follow the coefficient order.
    //
    // Given
    // -----
    // - No burn-in; column a holds 1..=5, column b holds 10, 20, ..., 50.
    //
    // Expect
    // ------
    // - `means()` = [3, 30]; `get("b")` is the second row; unknown names
    //   give `None`.
    fn rows_are_found_by_name_and_means_keep_order() {
        // Arrange
        let rows: Vec<[f64; 2]> = (1..=5).map(|i| [i as f64, 10.0 * i as f64]).collect();
        let chain = chain_from(&rows, 0);
        let names = vec!["a".to_string(), "b".to_string()];

        // Act
        let summary = summarize_chain(&chain, &names, 0.9).unwrap();

        // Assert
        let means = summary.means();
        assert_eq!(means.len(), 2);
        assert!((means[0] - 3.0).abs() < 1e-12);
        assert!((means[1] - 30.0).abs() < 1e-12);
        let b = summary.get("b").unwrap();
        assert_eq!(b, &summary.rows[1]);
        assert_eq!(b.mean, means[1]);
        assert!(summary.get("c").is_none());
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let chain = chain_from(&[[0.0, 0.0], [1.0, 1.0]], 1);
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            summarize_chain(&chain, &names, 1.5),
            Err(SamplerError::InvalidCredibleLevel { .. })
        ));
        assert_eq!(
            summarize_chain(&chain, &names[..1], 0.9).unwrap_err(),
            SamplerError::NameCountMismatch { expected: 2, found: 1 }
        );
        let empty = PosteriorChain::with_capacity(2, 2, 2);
        assert!(matches!(
            summarize_chain(&empty, &names, 0.9),
            Err(SamplerError::EmptyRetainedChain { steps: 2, burn_in: 2 })
        ));
    }
}
