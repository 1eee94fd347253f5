//! L-BFGS solver construction.
//!
//! Builders apply the memory size and the gradient / cost-change
//! tolerances from [`MLEOptions`]. The starting point and the iteration cap
//! are executor settings and are applied in [`run`](super::run).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        line_search::FeasibleStep,
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with a guarded Hager–Zhang line search.
///
/// # Errors
/// Any tolerance argmin rejects, as `OptError`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(FeasibleStep::new(HagerZhangLS::new()), mem), opts)
}

/// L-BFGS with a guarded More–Thuente line search.
///
/// # Errors
/// Any tolerance argmin rejects, as `OptError`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(FeasibleStep::new(MoreThuenteLS::new()), mem), opts)
}

/// Apply the optional tolerances; absent ones keep argmin's defaults.
///
/// # Errors
/// Propagates argmin's `with_tolerance_*` errors.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
