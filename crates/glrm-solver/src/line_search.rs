//! Per-unit backtracking proximal line search.
//!
//! One unit is either a single column of `X` (an example embedding,
//! k-vector) or one column block of `Y` (a feature embedding, k x w). Each
//! unit carries its own step size across outer iterations: units with easy
//! local geometry grow their steps over time, units with difficult
//! geometry self-throttle. A search either accepts exactly one candidate
//! that strictly decreases the unit's local objective, or shrinks its step
//! until the floor is hit and leaves the unit unchanged for the round.

use glrm_core::regularizer::Regularizer;
use glrm_core::types::Scalar;
use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, Dyn, OMatrix};

/// Step growth factor applied on acceptance.
const GROW: f64 = 1.05;
/// Step shrink factor applied on rejection.
const SHRINK: f64 = 0.7;
/// Multiple of the floor that a breached step is reset to.
const FLOOR_RESET: f64 = 1.1;

/// Result of one unit's line search.
pub(crate) struct SearchOutcome<T, C>
where
    T: Scalar,
    C: Dim,
    DefaultAllocator: Allocator<Dyn, C>,
{
    /// The accepted candidate, or `None` if the step floor was hit.
    pub accepted: Option<OMatrix<T, Dyn, C>>,
    /// Updated persistent step size for this unit.
    pub alpha: T,
    /// The unit's local objective after the search (the candidate's
    /// objective on acceptance, the baseline otherwise).
    pub objective: T,
}

/// Backtracking proximal-gradient search for one unit.
///
/// `nobs` is the unit's observed-entry count; the step is normalized by
/// `nobs + 1` so that units with more observations (a larger local
/// Lipschitz constant) take proportionally smaller raw steps. A unit with
/// no observations still runs with normalizer 1, its candidate shaped by
/// the proximal operator alone.
///
/// `objective` must evaluate the unit's full local objective (observed
/// losses plus the unit's regularizer) at a candidate.
pub(crate) fn prox_search<T, C, F>(
    current: &OMatrix<T, Dyn, C>,
    gradient: &OMatrix<T, Dyn, C>,
    reg: &Regularizer<T>,
    mut alpha: T,
    nobs: usize,
    min_stepsize: T,
    objective: F,
) -> SearchOutcome<T, C>
where
    T: Scalar,
    C: Dim,
    DefaultAllocator: Allocator<Dyn, C>,
    F: Fn(&OMatrix<T, Dyn, C>) -> T,
{
    let normalizer = <T as Scalar>::from_usize(nobs + 1);
    let baseline = objective(current);
    let mut candidate = current.clone_owned();

    loop {
        let step = alpha / normalizer;
        candidate.copy_from(current);
        for (c, g) in candidate.iter_mut().zip(gradient.iter()) {
            *c -= step * *g;
        }
        reg.prox(&mut candidate, step);

        let value = objective(&candidate);
        if value < baseline {
            return SearchOutcome {
                accepted: Some(candidate),
                alpha: alpha * <T as Scalar>::from_f64(GROW),
                objective: value,
            };
        }

        alpha *= <T as Scalar>::from_f64(SHRINK);
        if alpha < min_stepsize {
            // Give up for this round but keep the state usable next time.
            return SearchOutcome {
                accepted: None,
                alpha: <T as Scalar>::from_f64(FLOOR_RESET) * min_stepsize,
                objective: baseline,
            };
        }
    }
}
