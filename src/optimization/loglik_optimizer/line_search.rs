//! Feasibility guard around argmin's line searches.
//!
//! A model may return `ℓ = -∞` where it cannot be evaluated, e.g. a Poisson
//! linear predictor past the overflow bound. The adapter reports such points
//! as an infinite cost, which More–Thuente and Hager–Zhang cannot
//! interpolate through, and the first L-BFGS direction is the raw score, so
//! a unit step routinely lands there.
//!
//! Before each search, [`FeasibleStep`] scans the ray `θ + α d` and hands
//! the wrapped search a bounded step interval `[MIN_STEP, max_step]`:
//! - a trial step that is finite and does not raise the cost is doubled at
//!   most [`MAX_EXPANSIONS`] times while the cost stays finite;
//! - otherwise the step is halved until the cost is finite and no larger
//!   than at `θ`, and the interval ends at the previous trial step if that one
//!   was finite.
//!
//! When the cost still falls at `max_step`, the interval holds no minimum and
//! the guard takes the whole step itself. Otherwise the wrapped search runs on
//! the interval and only evaluates points between trial steps that were finite.
use argmin::core::{
    CostFunction, Error, Gradient, IterState, KV, Problem, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin::solver::linesearch::LineSearch;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::types::{Cost, Grad, HagerZhangLS, MoreThuenteLS, Theta},
};

/// Smallest step the guard tries and the lower bound of every search.
pub const MIN_STEP: f64 = 1e-10;

/// Doublings tried past a trial step that already descends.
pub const MAX_EXPANSIONS: usize = 3;

type LineSearchState = IterState<Theta, Grad, (), (), (), Cost>;

/// Line searches that can be restricted to `[MIN_STEP, max_step]`.
pub trait BoundedLineSearch: Sized {
    /// Copy of `self` limited to `max_step`, first trying a step no larger
    /// than `initial`.
    ///
    /// # Errors
    /// argmin's bound validation.
    fn bounded(&self, max_step: f64, initial: f64) -> Result<Self, Error>;
}

impl BoundedLineSearch for MoreThuenteLS {
    fn bounded(&self, max_step: f64, initial: f64) -> Result<Self, Error> {
        let mut search = self.clone().with_bounds(MIN_STEP, max_step)?;
        search.initial_step_length(initial.min(max_step))?;
        Ok(search)
    }
}

impl BoundedLineSearch for HagerZhangLS {
    /// Hager–Zhang evaluates both interval ends up front and uses `initial`
    /// as an interior point, so it is kept below `max_step`.
    fn bounded(&self, max_step: f64, initial: f64) -> Result<Self, Error> {
        let mut search = self.clone().with_bounds(MIN_STEP, max_step)?;
        search.initial_step_length(initial.min(0.5 * max_step))?;
        Ok(search)
    }
}

/// Step interval found by probing the search ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBound {
    pub max_step: f64,
    pub initial: f64,
}

/// Scan `origin + α direction` starting at `initial` and return the
/// interval the wrapped search may use. `start_cost` is the cost at
/// `origin`.
///
/// When halving never reaches descent, the largest finite trial step is used so
/// the wrapped search can still decide.
///
/// # Errors
/// - [`OptError::NoFeasibleStep`] when every trial step down to [`MIN_STEP`] is
///   infinite.
/// - Cost errors from the problem (e.g. a NaN log-likelihood).
pub fn step_bound<O>(
    problem: &mut Problem<O>, origin: &Theta, direction: &Theta, initial: f64, start_cost: Cost,
) -> Result<StepBound, Error>
where
    O: CostFunction<Param = Theta, Output = Cost>,
{
    let mut cost_at = |step: f64| problem.cost(&along(origin, direction, step));

    let first = cost_at(initial)?;
    if first.is_finite() && first <= start_cost {
        let mut max_step = initial;
        for _ in 0..MAX_EXPANSIONS {
            if !cost_at(2.0 * max_step)?.is_finite() {
                break;
            }
            max_step *= 2.0;
        }
        return Ok(StepBound { max_step, initial });
    }

    let mut largest_finite = first.is_finite().then_some(initial);
    let (mut previous_step, mut previous_cost) = (initial, first);
    loop {
        let step = 0.5 * previous_step;
        if step <= MIN_STEP {
            break;
        }
        let cost = cost_at(step)?;
        if cost.is_finite() && cost <= start_cost {
            let max_step = if previous_cost.is_finite() { previous_step } else { step };
            return Ok(StepBound { max_step, initial: step });
        }
        if largest_finite.is_none() && cost.is_finite() {
            largest_finite = Some(step);
        }
        (previous_step, previous_cost) = (step, cost);
    }
    match largest_finite {
        Some(max_step) => Ok(StepBound { max_step, initial: max_step }),
        None => Err(OptError::NoFeasibleStep { min_step: MIN_STEP }.into()),
    }
}

fn along(origin: &Theta, direction: &Theta, step: f64) -> Theta {
    let mut point = origin.clone();
    point.scaled_add(step, direction);
    point
}

/// Wraps a line search so it only runs on a scanned, finite step interval.
#[derive(Debug, Clone)]
pub struct FeasibleStep<L> {
    search: L,
    direction: Option<Theta>,
    initial_step: f64,
    active: Option<L>,
}

impl<L> FeasibleStep<L> {
    /// Guard `search`, starting each scan at a unit step.
    pub fn new(search: L) -> Self {
        Self { search, direction: None, initial_step: 1.0, active: None }
    }
}

impl<L: LineSearch<Theta, Cost>> LineSearch<Theta, Cost> for FeasibleStep<L> {
    fn search_direction(&mut self, direction: Theta) {
        self.search.search_direction(direction.clone());
        self.direction = Some(direction);
    }

    fn initial_step_length(&mut self, step_length: Cost) -> Result<(), Error> {
        if !(step_length.is_finite() && step_length > 0.0) {
            return Err(OptError::InvalidStepLength { value: step_length }.into());
        }
        self.initial_step = step_length;
        Ok(())
    }
}

impl<O, L> Solver<O, LineSearchState> for FeasibleStep<L>
where
    O: CostFunction<Param = Theta, Output = Cost> + Gradient<Param = Theta, Gradient = Grad>,
    L: Solver<O, LineSearchState> + LineSearch<Theta, Cost> + BoundedLineSearch,
{
    const NAME: &'static str = "Feasible-step line search";

    fn init(
        &mut self, problem: &mut Problem<O>, state: LineSearchState,
    ) -> Result<(LineSearchState, Option<KV>), Error> {
        let (Some(origin), Some(direction)) = (state.get_param().cloned(), self.direction.clone())
        else {
            // The wrapped search reports what is missing.
            return self.search.init(problem, state);
        };
        let start_cost = match state.get_cost() {
            cost if cost.is_finite() => cost,
            _ => problem.cost(&origin)?,
        };
        let bound = step_bound(problem, &origin, &direction, self.initial_step, start_cost)?;

        let end = along(&origin, &direction, bound.max_step);
        let end_cost = problem.cost(&end)?;
        if end_cost <= start_cost && problem.gradient(&end)?.dot(&direction) < 0.0 {
            self.active = None;
            let state = state.param(end).cost(end_cost);
            return Ok((state.terminate_with(TerminationReason::SolverConverged), None));
        }

        let mut active = self.search.bounded(bound.max_step, bound.initial)?;
        active.search_direction(direction);
        let initialized = active.init(problem, state);
        self.active = Some(active);
        initialized
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: LineSearchState,
    ) -> Result<(LineSearchState, Option<KV>), Error> {
        match self.active.as_mut() {
            Some(active) => active.next_iter(problem, state),
            None => self.search.next_iter(problem, state),
        }
    }

    fn terminate(&mut self, state: &LineSearchState) -> TerminationStatus {
        match self.active.as_mut() {
            Some(active) => active.terminate(state),
            None => self.search.terminate(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptResult,
        loglik_optimizer::{
            LineSearcher, LogLikelihood, MLEOptions, adapter::ArgMinAdapter, maximize,
        },
    };
    use ndarray::array;

    // ℓ(θ) = 100 θ − exp(θ) for θ ≤ 6, −∞ beyond; maximized at ln 100.
    struct Fenced;

    impl LogLikelihood for Fenced {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            let t = theta[0];
            Ok(if t <= 6.0 { 100.0 * t - t.exp() } else { f64::NEG_INFINITY })
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            let t = theta[0];
            if t > 6.0 {
                return Err(OptError::NonFiniteCost { value: f64::NEG_INFINITY });
            }
            Ok(array![100.0 - t.exp()])
        }
    }

    #[test]
    // Purpose
    // -------
    // An infeasible unit step is halved until it descends, and the search
    // interval ends at the last finite trial step.
    //
    // Given
    // -----
    // - `Fenced` at θ = 0 with direction d = 99 (the negated cost gradient).
    //
    // Expect
    // ------
    // - Trial points 99, 49.5, 24.75, 12.375, 6.1875 are infeasible; 3.09375 (step
    //   1/32) descends, so max_step = initial = 1/32.
    fn halves_an_infeasible_step_until_descent() {
        // Arrange
        let mut problem = Problem::new(ArgMinAdapter::new(&Fenced, &()));
        let start_cost = 1.0; // −ℓ(0)

        // Act
        let bound = step_bound(&mut problem, &array![0.0], &array![99.0], 1.0, start_cost).unwrap();

        // Assert
        assert_eq!(bound, StepBound { max_step: 1.0 / 32.0, initial: 1.0 / 32.0 });
    }

    #[test]
    fn descending_step_is_expanded_while_finite() {
        let mut problem = Problem::new(ArgMinAdapter::new(&Fenced, &()));
        let bound = step_bound(&mut problem, &array![0.0], &array![1.0], 1.0, 1.0).unwrap();
        // θ = 1, 2, 4 are feasible; θ = 8 is not.
        assert_eq!(bound, StepBound { max_step: 4.0, initial: 1.0 });
    }

    #[test]
    fn no_finite_trial_step_is_an_error() {
        let mut problem = Problem::new(ArgMinAdapter::new(&Fenced, &()));
        let err = step_bound(&mut problem, &array![7.0], &array![1.0], 1.0, 0.0).unwrap_err();
        assert_eq!(OptError::from(err), OptError::NoFeasibleStep { min_step: MIN_STEP });
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS reaches an optimum whose first unit step is infeasible, under
    // both line searches.
    //
    // Given
    // -----
    // - `Fenced` from θ = 0; the raw score is 99, the fence is at 6.
    //
    // Expect
    // ------
    // - `converged`, θ̂ ≈ ln 100.
    fn maximize_backs_off_from_infeasible_trial_points() {
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let opts = MLEOptions { line_searcher: searcher, ..MLEOptions::default() };

            // Act
            let out = maximize(&Fenced, array![0.0], &(), &opts).unwrap();

            // Assert
            assert!(out.converged, "{searcher:?}: {}", out.status);
            assert!((out.theta_hat[0] - 100f64.ln()).abs() < 1e-6, "{searcher:?}");
        }
    }

    #[test]
    fn initial_step_length_must_be_positive() {
        let mut guard = FeasibleStep::new(MoreThuenteLS::new());
        assert!(guard.initial_step_length(0.5).is_ok());
        let err = guard.initial_step_length(-1.0).unwrap_err();
        assert_eq!(OptError::from(err), OptError::InvalidStepLength { value: -1.0 });
    }
}
