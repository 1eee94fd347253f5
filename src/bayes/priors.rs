//! Independent Normal priors for the MNL coefficients.
//!
//! The prior is `βⱼ ~ N(μⱼ, σⱼ²)` independently. [`NormalPrior::from_blocks`]
//! builds the common setup for choice experiments: a wide variance on
//! preference (part-worth) coefficients and a tighter one on the price
//! coefficient, located through the design's price column role.
use crate::bayes::errors::{SamplerError, SamplerResult};
use crate::data::DesignMatrix;
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

/// Block variances used by [`NormalPrior::from_blocks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorBlocks {
    /// Variance for every non-price coefficient.
    pub preference_variance: f64,
    /// Variance for the price coefficient.
    pub price_variance: f64,
}

impl Default for PriorBlocks {
    fn default() -> Self {
        Self { preference_variance: 10.0, price_variance: 1.0 }
    }
}

/// Independent Normal prior, one component per coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalPrior {
    means: Array1<f64>,
    variances: Array1<f64>,
}

impl NormalPrior {
    /// # Errors
    /// - [`SamplerError::PriorDimMismatch`] when lengths differ.
    /// - [`SamplerError::InvalidPriorMean`] for a non-finite mean.
    /// - [`SamplerError::InvalidPriorVariance`] for a non-positive or
    ///   non-finite variance.
    pub fn new(means: Array1<f64>, variances: Array1<f64>) -> SamplerResult<Self> {
        if means.len() != variances.len() {
            return Err(SamplerError::PriorDimMismatch {
                expected: means.len(),
                found: variances.len(),
            });
        }
        if let Some((index, &value)) = means.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(SamplerError::InvalidPriorMean { index, value });
        }
        if let Some((index, &value)) =
            variances.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(SamplerError::InvalidPriorVariance { index, value });
        }
        Ok(Self { means, variances })
    }

    /// `N(0, variance)` on each of `dim` coefficients.
    ///
    /// # Errors
    /// [`SamplerError::InvalidPriorVariance`] for a bad `variance`.
    pub fn zero_mean(dim: usize, variance: f64) -> SamplerResult<Self> {
        Self::new(Array1::zeros(dim), Array1::from_elem(dim, variance))
    }

    /// Effectively flat `N(0, 10⁶)` prior; the posterior then tracks the
    /// likelihood.
    ///
    /// # Errors
    /// Never in practice; kept fallible for a uniform constructor surface.
    pub fn diffuse(dim: usize) -> SamplerResult<Self> {
        Self::zero_mean(dim, 1e6)
    }

    /// Zero-mean prior with `blocks.price_variance` on the design's price
    /// column and `blocks.preference_variance` everywhere else.
    ///
    /// # Errors
    /// [`SamplerError::InvalidPriorVariance`] for a bad block variance.
    pub fn from_blocks(design: &DesignMatrix, blocks: PriorBlocks) -> SamplerResult<Self> {
        let mut variances = Array1::from_elem(design.ncols(), blocks.preference_variance);
        if let Some(price) = design.roles().price {
            variances[price] = blocks.price_variance;
        }
        Self::new(Array1::zeros(design.ncols()), variances)
    }

    pub fn dim(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn variances(&self) -> &Array1<f64> {
        &self.variances
    }

    /// `ln p(β)`, including normalizing constants.
    pub fn log_density(&self, beta: ArrayView1<'_, f64>) -> f64 {
        beta.iter()
            .zip(self.means.iter().zip(self.variances.iter()))
            .map(|(&b, (&m, &v))| log_normal_density(b, m, v))
            .sum()
    }
}

fn log_normal_density(value: f64, mean: f64, variance: f64) -> f64 {
    let centered = value - mean;
    -0.5 * ((2.0 * PI * variance).ln() + centered * centered / variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn log_density_matches_standard_normal() {
        let prior = NormalPrior::zero_mean(2, 1.0).unwrap();
        let expected = -(2.0 * PI).ln() - 0.5 * (1.0 + 4.0);
        assert!((prior.log_density(array![1.0, -2.0].view()) - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Block construction puts the tight variance on the price role only.
    //
    // Given
    // -----
    // - Columns [brand, feature, price] with price tagged.
    //
    // Expect
    // ------
    // - Variances [10, 10, 1]; zero means.
    fn from_blocks_uses_price_role() {
        // Arrange
        let design = DesignMatrix::new(
            array![[1.0, 0.0, 2.5], [0.0, 1.0, 3.0]],
            vec!["brand".into(), "feature".into(), "price".into()],
        )
        .unwrap()
        .with_price_column("price")
        .unwrap();

        // Act
        let prior = NormalPrior::from_blocks(&design, PriorBlocks::default()).unwrap();

        // Assert
        assert_eq!(prior.variances(), &array![10.0, 10.0, 1.0]);
        assert_eq!(prior.means(), &array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        assert_eq!(
            NormalPrior::new(array![0.0], array![0.0]).unwrap_err(),
            SamplerError::InvalidPriorVariance { index: 0, value: 0.0 }
        );
        assert!(matches!(
            NormalPrior::new(array![f64::NAN, 0.0], array![1.0, 1.0]),
            Err(SamplerError::InvalidPriorMean { index: 0, .. })
        ));
        assert!(matches!(
            NormalPrior::new(array![0.0, 0.0], array![1.0]),
            Err(SamplerError::PriorDimMismatch { expected: 2, found: 1 })
        ));
    }
}
