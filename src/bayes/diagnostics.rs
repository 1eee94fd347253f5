//! Single-chain convergence diagnostics for scalar traces.
//!
//! All functions take one parameter's retained draws in chain order.

/// Lag-`lag` sample autocorrelation; 0 for a constant series or a lag
/// beyond the series.
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if lag >= series.len() {
        return 0.0;
    }
    let centered = centered(series);
    let denominator = lagged_sum(&centered, 0);
    if denominator <= 0.0 {
        return 0.0;
    }
    lagged_sum(&centered, lag) / denominator
}

/// Effective sample size `n / (1 + 2 Σ ρₖ)`, summing autocorrelations until
/// the first non-positive lag. Never exceeds `n`.
pub fn effective_sample_size(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return n as f64;
    }
    let centered = centered(series);
    let denominator = lagged_sum(&centered, 0);
    let mut rho_sum = 0.0;
    if denominator > 0.0 {
        for lag in 1..n {
            let rho = lagged_sum(&centered, lag) / denominator;
            if rho <= 0.0 {
                break;
            }
            rho_sum += rho;
        }
    }
    n as f64 / (1.0 + 2.0 * rho_sum).max(1.0)
}

/// Geweke z-score comparing the first 10% of the series with the last 50%.
///
/// Segment variances are divided by each segment's effective sample size,
/// which stands in for the spectral density at zero. Returns `NaN` when a
/// segment has fewer than two draws and 0 when both segments are constant.
pub fn geweke_z(series: &[f64]) -> f64 {
    let n = series.len();
    let first = &series[..n / 10];
    let last = &series[n - n / 2..];
    if first.len() < 2 || last.len() < 2 {
        return f64::NAN;
    }
    let se2 = |segment: &[f64]| variance(segment) / effective_sample_size(segment);
    let denominator = (se2(first) + se2(last)).sqrt();
    if !(denominator > 0.0) {
        return 0.0;
    }
    (mean(first) - mean(last)) / denominator
}

fn centered(series: &[f64]) -> Vec<f64> {
    let m = mean(series);
    series.iter().map(|v| v - m).collect()
}

// Σ c[t] c[t + lag] over the overlapping part.
fn lagged_sum(centered: &[f64], lag: usize) -> f64 {
    centered.iter().zip(&centered[lag..]).map(|(a, b)| a * b).sum()
}

pub(crate) fn mean(series: &[f64]) -> f64 {
    series.iter().sum::<f64>() / series.len() as f64
}

/// Unbiased sample variance; 0 for fewer than two values.
pub(crate) fn variance(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let m = mean(series);
    series.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (series.len() - 1) as f64
}
