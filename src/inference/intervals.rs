//! Normal-approximation coefficient tables for maximum-likelihood fits.
//!
//! Each row reports `estimate ± z·SE` with `z = Φ⁻¹((1 + level)/2)`, plus the
//! Wald statistic `estimate / SE` and its two-sided p-value. These intervals
//! rely on the asymptotic normality of `β̂`; they are symmetric by
//! construction and can be inaccurate when the likelihood is visibly skewed
//! (small samples, rare outcomes, estimates near a boundary).
use crate::inference::errors::{InferenceError, InferenceResult};
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// Confidence level for coefficient intervals (default 0.95).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalOptions {
    pub level: f64,
}

impl IntervalOptions {
    /// # Errors
    /// [`InferenceError::InvalidConfidenceLevel`] unless `0 < level < 1`.
    pub fn new(level: f64) -> InferenceResult<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(InferenceError::InvalidConfidenceLevel { level });
        }
        Ok(Self { level })
    }

    /// Two-sided critical value `Φ⁻¹((1 + level)/2)`; ≈ 1.96 at 0.95.
    pub fn z_critical(&self) -> f64 {
        standard_normal_quantile(0.5 + 0.5 * self.level)
    }
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self { level: 0.95 }
    }
}

/// One coefficient: point estimate, standard error and Wald interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub z_value: f64,
    pub p_value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Coefficient table in design-column order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    rows: Vec<CoefficientRow>,
    level: f64,
}

impl CoefficientTable {
    /// Build rows from names, estimates and standard errors.
    ///
    /// # Errors
    /// - [`InferenceError::NameCountMismatch`] when `names` and `estimates`
    ///   differ in length.
    /// - [`InferenceError::MatrixDimMismatch`] when `std_errors` differs in
    ///   length from `estimates`.
    pub fn new(
        names: &[String], estimates: &Array1<f64>, std_errors: &Array1<f64>,
        opts: &IntervalOptions,
    ) -> InferenceResult<Self> {
        let k = estimates.len();
        if names.len() != k {
            return Err(InferenceError::NameCountMismatch { expected: k, found: names.len() });
        }
        if std_errors.len() != k {
            return Err(InferenceError::MatrixDimMismatch {
                expected: k,
                found: (std_errors.len(), 1),
            });
        }
        let z = opts.z_critical();
        let rows = names
            .iter()
            .zip(estimates.iter().zip(std_errors.iter()))
            .map(|(name, (&estimate, &std_error))| {
                let z_value = estimate / std_error;
                CoefficientRow {
                    name: name.clone(),
                    estimate,
                    std_error,
                    z_value,
                    p_value: 2.0 * (1.0 - standard_normal_cdf(z_value.abs())),
                    lower: estimate - z * std_error,
                    upper: estimate + z * std_error,
                }
            })
            .collect();
        Ok(Self { rows, level: opts.level })
    }

    pub fn rows(&self) -> &[CoefficientRow] {
        &self.rows
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Row for the coefficient called `name`.
    pub fn get(&self, name: &str) -> Option<&CoefficientRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn estimates(&self) -> Array1<f64> {
        self.rows.iter().map(|row| row.estimate).collect()
    }

    pub fn std_errors(&self) -> Array1<f64> {
        self.rows.iter().map(|row| row.std_error).collect()
    }
}

impl fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = 100.0 * self.level;
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>9} {:>8} {:>12} {:>12}",
            "coef",
            "estimate",
            "std_err",
            "z",
            "P>|z|",
            format!("lo{pct:.0}%"),
            format!("hi{pct:.0}%")
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<16} {:>12.6} {:>12.6} {:>9.3} {:>8.4} {:>12.6} {:>12.6}",
                row.name,
                row.estimate,
                row.std_error,
                row.z_value,
                row.p_value,
                row.lower,
                row.upper
            )?;
        }
        Ok(())
    }
}

fn standard_normal_quantile(p: f64) -> f64 {
    Normal::new(0.0, 1.0).map_or(f64::NAN, |normal| normal.inverse_cdf(p))
}

fn standard_normal_cdf(x: f64) -> f64 {
    Normal::new(0.0, 1.0).map_or(f64::NAN, |normal| normal.cdf(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The default 95% interval uses z ≈ 1.96 and is symmetric.
    //
    // Given
    // -----
    // - One coefficient, estimate 0.5, SE 0.1.
    //
    // Expect
    // ------
    // - [0.5 − 0.196, 0.5 + 0.196], z-value 5, tiny p-value.
    fn default_interval_uses_normal_quantile() {
        // Arrange
        let names = vec!["price".to_string()];

        // Act
        let table =
            CoefficientTable::new(&names, &array![0.5], &array![0.1], &IntervalOptions::default())
                .unwrap();

        // Assert
        let row = table.get("price").unwrap();
        assert!((IntervalOptions::default().z_critical() - 1.959964).abs() < 1e-5);
        assert!((row.lower - (0.5 - 0.1959964)).abs() < 1e-6);
        assert!((row.upper - (0.5 + 0.1959964)).abs() < 1e-6);
        assert!((row.z_value - 5.0).abs() < 1e-12);
        assert!(row.p_value < 1e-5);
    }

    #[test]
    fn wider_level_gives_wider_interval() {
        let names = vec!["a".to_string()];
        let narrow = CoefficientTable::new(
            &names,
            &array![0.0],
            &array![1.0],
            &IntervalOptions::new(0.8).unwrap(),
        )
        .unwrap();
        let wide = CoefficientTable::new(
            &names,
            &array![0.0],
            &array![1.0],
            &IntervalOptions::new(0.99).unwrap(),
        )
        .unwrap();
        assert!(wide.rows()[0].upper > narrow.rows()[0].upper);
        assert!((narrow.rows()[0].p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        assert!(matches!(
            IntervalOptions::new(1.0),
            Err(InferenceError::InvalidConfidenceLevel { .. })
        ));
        assert!(IntervalOptions::new(f64::NAN).is_err());
        let err = CoefficientTable::new(
            &["a".to_string()],
            &array![1.0, 2.0],
            &array![0.1, 0.2],
            &IntervalOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, InferenceError::NameCountMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn display_lists_every_coefficient() {
        let names = vec!["const".to_string(), "x".to_string()];
        let table = CoefficientTable::new(
            &names,
            &array![1.0, -0.5],
            &array![0.2, 0.1],
            &IntervalOptions::default(),
        )
        .unwrap();
        let text = table.to_string();
        assert!(text.contains("const"));
        assert!(text.contains("lo95%"));
        assert_eq!(text.lines().count(), 3);
    }
}
