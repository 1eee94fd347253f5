//! Entry point for maximizing a model's log-likelihood.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS.
///
/// # Behavior
/// - Validates the starting point with `f.check(&theta0, data)` and requires
///   `ℓ(θ₀)` to be finite.
/// - Minimizes `-ℓ(θ)` through [`ArgMinAdapter`] with the line search named
///   in `opts.line_searcher`.
/// - Stops on the gradient-norm or cost-change tolerance, or at
///   `opts.tols.max_iter`; only the first two count as convergence.
///
/// The outcome is returned even when `converged == false` so callers can
/// inspect the last iterate; model-level `fit` refuses such outcomes.
///
/// # Errors
/// - Any error from `f.check`.
/// - [`OptError::NonFiniteCost`] when the starting point is infeasible or
///   its log-likelihood is NaN.
/// - Builder errors for tolerances argmin rejects.
/// - Runtime errors, e.g. a NaN log-likelihood at a trial point.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_choice_models::optimization::errors::OptResult;
/// use rust_choice_models::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Quadratic;
/// impl LogLikelihood for Quadratic {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Quadratic, array![0.5, -0.5], &(), &MLEOptions::default())?;
/// assert!(out.converged);
/// # Ok::<(), rust_choice_models::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let start = f.value(&theta0, data)?;
    if !start.is_finite() {
        return Err(OptError::NonFiniteCost { value: start });
    }
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{Cost, Grad, Tolerances};
    use ndarray::array;

    // ℓ(θ) = -Σ wᵢ (θᵢ - cᵢ)², maximized at c.
    struct Paraboloid {
        center: Theta,
        weights: Theta,
    }

    impl LogLikelihood for Paraboloid {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            let d = theta - &self.center;
            Ok(-(&self.weights * &d * &d).sum())
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta.len() != self.center.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: self.center.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(-2.0 * &self.weights * (theta - &self.center))
        }
    }

    fn paraboloid() -> Paraboloid {
        Paraboloid { center: array![1.0, -2.0, 0.5], weights: array![1.0, 4.0, 0.25] }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the maximizer of a separable paraboloid.
    //
    // Given
    // -----
    // - Center (1, -2, 0.5), unequal weights, start at the origin.
    //
    // Expect
    // ------
    // - `converged`, θ̂ within 1e-5 of the center, ℓ(θ̂) ≈ 0.
    fn maximize_finds_paraboloid_center_with_both_line_searches() {
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let model = paraboloid();
            let opts = MLEOptions { line_searcher: searcher, ..MLEOptions::default() };

            // Act
            let out = maximize(&model, array![0.0, 0.0, 0.0], &(), &opts).unwrap();

            // Assert
            assert!(out.converged, "{searcher:?} did not converge: {}", out.status);
            for (est, truth) in out.theta_hat.iter().zip(model.center.iter()) {
                assert!((est - truth).abs() < 1e-5, "{searcher:?}: {est} vs {truth}");
            }
            assert!(out.value.abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // A one-iteration cap is reported as non-convergence, not as an error.
    fn iteration_cap_reports_non_convergence() {
        // Arrange
        let model = paraboloid();
        let tols = Tolerances::new(Some(1e-12), None, Some(1)).unwrap();
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        // Act
        let out = maximize(&model, array![10.0, 10.0, 10.0], &(), &opts).unwrap();

        // Assert
        assert!(!out.converged);
        assert_eq!(out.status, "MaxItersReached");
    }

    #[test]
    fn check_runs_before_optimization() {
        let err = maximize(&paraboloid(), array![0.0], &(), &MLEOptions::default()).unwrap_err();
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, actual: 1 });
    }

    // ℓ(θ) = -(θ + 1)² on θ ≤ 0, infeasible beyond.
    struct HalfLine;

    impl LogLikelihood for HalfLine {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            let t = theta[0];
            Ok(if t <= 0.0 { -(t + 1.0).powi(2) } else { f64::NEG_INFINITY })
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // An infeasible start is rejected before any iteration, while a feasible
    // start on the same model converges.
    //
    // Given
    // -----
    // - `HalfLine` started at θ = 1 and at θ = -3.
    //
    // Expect
    // ------
    // - θ = 1 gives `NonFiniteCost { value: -∞ }`; θ = -3 converges to -1.
    fn infeasible_start_is_rejected() {
        // Arrange
        let opts = MLEOptions::default();

        // Act
        let err = maximize(&HalfLine, array![1.0], &(), &opts).unwrap_err();
        let out = maximize(&HalfLine, array![-3.0], &(), &opts).unwrap();

        // Assert
        assert_eq!(err, OptError::NonFiniteCost { value: f64::NEG_INFINITY });
        assert!(out.converged, "{}", out.status);
        assert!((out.theta_hat[0] + 1.0).abs() < 1e-5);
    }
}
