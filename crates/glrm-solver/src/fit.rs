//! Alternating proximal-gradient driver.
//!
//! The driver alternates an X-phase (every example embedding updated by
//! its own line search against the fixed `Y`) and a Y-phase (every feature
//! block updated against the fixed `X`), recomputing the factor product
//! after each phase. The factors are mutated in place; everything else the
//! loop touches is preallocated scratch reused across iterations.
//!
//! Phase ordering is strict: a phase's parallel searches read the factors
//! immutably and return owned updates, which the driver applies serially
//! before the next product recomputation. The objective recorded per outer
//! iteration is the sum of the per-feature objectives produced by the
//! Y-phase line searches.

use crate::error::SolverResult;
use crate::gradient::compute_gradients;
use crate::line_search::prox_search;
use crate::params::ProxGradParams;
use glrm_core::history::ConvergenceHistory;
use glrm_core::model::Glrm;
use glrm_core::types::{DMatrix, DVector, Scalar};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Reason the driver stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// The objective decrease fell below the configured tolerances.
    Converged,
    /// The outer-iteration budget was exhausted.
    MaxIterations,
}

/// Outcome of a fit: final objective, diagnostics and the convergence
/// history. The fitted factors live in the model passed to [`fit`].
#[derive(Debug, Clone)]
pub struct FitResult<T: Scalar> {
    /// Objective value at the final factors (observed losses plus column
    /// regularizers, as tracked by the driver).
    pub objective: T,

    /// Number of outer iterations performed.
    pub iterations: usize,

    /// Wall-clock time elapsed during fitting.
    pub duration: Duration,

    /// Why the driver stopped.
    pub termination_reason: TerminationReason,

    /// True if the stopping rule (rather than the iteration budget)
    /// ended the fit.
    pub converged: bool,

    /// Per-iteration (elapsed seconds, objective) trace, including the
    /// initial evaluation.
    pub history: ConvergenceHistory<T>,
}

/// Fits the model by alternating proximal-gradient descent, mutating its
/// factors in place.
///
/// # Errors
///
/// Returns an error if the parameters fail validation. Numerical failures
/// inside losses or proximal operators surface as rejected steps rather
/// than errors: a candidate with a NaN objective never satisfies the
/// strict-decrease test.
pub fn fit<T: Scalar>(model: &mut Glrm<T>, params: &ProxGradParams<T>) -> SolverResult<FitResult<T>> {
    params.validate()?;
    let start = Instant::now();

    let m = model.nrows();
    let n = model.ncols();
    let k = model.rank();
    let d = model.embedding_dim();

    // Recoverable initialization defects: a mis-shaped or identically
    // zero Y makes every gradient degenerate.
    if model.y.nrows() != k || model.y.ncols() != d {
        log::warn!(
            "Y has shape {}x{} but the loss assignment implies {}x{}; reinitializing Y",
            model.y.nrows(),
            model.y.ncols(),
            k,
            d
        );
        model.reinit_y(&mut rand::thread_rng(), <T as Scalar>::from_f64(0.01));
    } else if model.y.iter().all(|v| *v == T::zero()) {
        log::warn!("Y is identically zero; reinitializing Y with small random values");
        model.reinit_y(&mut rand::thread_rng(), <T as Scalar>::from_f64(0.01));
    }

    let scaled_abs_tol = params.abs_tol * <T as Scalar>::from_usize(model.index().len());

    // Scratch allocated once and reused for the whole fit.
    let mut alpharow = vec![params.stepsize; m];
    let mut alphacol = vec![params.stepsize; n];
    let mut product = DMatrix::<T>::zeros(d, m);
    let mut gx = DMatrix::<T>::zeros(k, m);
    let mut gy = DMatrix::<T>::zeros(k, d);
    let mut obj_by_group = vec![T::zero(); n];
    let mut history = ConvergenceHistory::new();

    recompute_product(&mut product, model);

    for (j, slot) in obj_by_group.iter_mut().enumerate() {
        let (offset, width) = model.column_group(j);
        *slot = model.col_objective(j, &model.y.columns(offset, width).clone_owned());
    }
    let mut objective = sum(&obj_by_group);
    history.append(start.elapsed().as_secs_f64(), objective);

    // With multiple inner passes the phases behave like alternating
    // minimization restarts, so both step arrays go back to the initial
    // step at every X-phase. Single-pass fits keep their per-unit memory.
    let reset_steps = params.inner_iter_x > 1 || params.inner_iter_y > 1;

    let mut iterations = 0;
    let mut termination_reason = TerminationReason::MaxIterations;

    for iteration in 1..=params.max_iter {
        iterations = iteration;
        if reset_steps {
            alpharow.fill(params.stepsize);
            alphacol.fill(params.stepsize);
        }

        for _ in 0..params.inner_iter_x {
            compute_gradients(model, &product, &mut gx, &mut gy);

            let updates: Vec<(Option<DVector<T>>, T)> = (0..m)
                .into_par_iter()
                .map(|i| {
                    let current = model.x.column(i).clone_owned();
                    let gradient = gx.column(i).clone_owned();
                    let outcome = prox_search(
                        &current,
                        &gradient,
                        &model.rx()[i],
                        alpharow[i],
                        model.index().observed_features(i).len(),
                        params.min_stepsize,
                        |v| model.row_objective(i, v),
                    );
                    (outcome.accepted, outcome.alpha)
                })
                .collect();

            for (i, (accepted, alpha)) in updates.into_iter().enumerate() {
                if let Some(v) = accepted {
                    model.x.set_column(i, &v);
                }
                alpharow[i] = alpha;
            }
            recompute_product(&mut product, model);
        }

        for _ in 0..params.inner_iter_y {
            compute_gradients(model, &product, &mut gx, &mut gy);

            let updates: Vec<(Option<DMatrix<T>>, T, T)> = (0..n)
                .into_par_iter()
                .map(|j| {
                    let (offset, width) = model.column_group(j);
                    let current = model.y.columns(offset, width).clone_owned();
                    let gradient = gy.columns(offset, width).clone_owned();
                    let outcome = prox_search(
                        &current,
                        &gradient,
                        &model.ry()[j],
                        alphacol[j],
                        model.index().observed_examples(j).len(),
                        params.min_stepsize,
                        |block| model.col_objective(j, block),
                    );
                    (outcome.accepted, outcome.alpha, outcome.objective)
                })
                .collect();

            for (j, (accepted, alpha, local_objective)) in updates.into_iter().enumerate() {
                if let Some(block) = accepted {
                    let (offset, width) = model.column_group(j);
                    model.y.columns_mut(offset, width).copy_from(&block);
                }
                alphacol[j] = alpha;
                obj_by_group[j] = local_objective;
            }
            recompute_product(&mut product, model);
        }

        objective = sum(&obj_by_group);
        history.append(start.elapsed().as_secs_f64(), objective);

        // The first iterations of a fresh factorization decrease noisily;
        // only trust the tolerances after they settle.
        if iteration > 10 {
            let previous = history
                .second_last_objective()
                .expect("history carries one entry per outer iteration plus the initial one");
            let decrease = previous - objective;
            if decrease < scaled_abs_tol || decrease / objective < params.rel_tol {
                termination_reason = TerminationReason::Converged;
                break;
            }
        }
    }

    Ok(FitResult {
        objective,
        iterations,
        duration: start.elapsed(),
        termination_reason,
        converged: termination_reason == TerminationReason::Converged,
        history,
    })
}

/// Full recomputation of the factor product Y'X (d x m). Incremental
/// updates are not worth it: every unit may have moved during a phase.
fn recompute_product<T: Scalar>(product: &mut DMatrix<T>, model: &Glrm<T>) {
    product.gemm_tr(T::one(), &model.y, &model.x, T::zero());
}

fn sum<T: Scalar>(values: &[T]) -> T {
    values.iter().fold(T::zero(), |acc, &v| acc + v)
}
