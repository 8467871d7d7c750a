//! Solver parameters for alternating proximal-gradient fitting.

use crate::error::{FitError, SolverResult};
use glrm_core::types::Scalar;

/// Configuration of the alternating proximal-gradient solver.
///
/// The defaults follow the usual GLRM practice: unit initial step, a step
/// floor at one percent of the initial step, and tolerances scaled during
/// the fit (the absolute tolerance by the observed-entry count, the
/// relative tolerance by the current objective).
///
/// # Example
///
/// ```
/// use glrm_solver::ProxGradParams;
///
/// let params = ProxGradParams::<f64>::new()
///     .with_max_iter(200)
///     .with_stepsize(0.5)
///     .with_inner_iter(2);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxGradParams<T: Scalar> {
    /// Initial step size for every row and column line search.
    pub stepsize: T,

    /// Maximum number of outer iterations. Zero is allowed and leaves the
    /// factors untouched.
    pub max_iter: usize,

    /// Number of X-phase passes per outer iteration.
    pub inner_iter_x: usize,

    /// Number of Y-phase passes per outer iteration.
    pub inner_iter_y: usize,

    /// Absolute objective-decrease tolerance, scaled by the number of
    /// observed entries.
    pub abs_tol: T,

    /// Relative objective-decrease tolerance.
    pub rel_tol: T,

    /// Step-size floor. A line search whose step falls below this floor
    /// gives up for the round and resets its step to 1.1x the floor.
    pub min_stepsize: T,
}

impl<T: Scalar> Default for ProxGradParams<T> {
    fn default() -> Self {
        Self {
            stepsize: T::DEFAULT_STEPSIZE,
            max_iter: 100,
            inner_iter_x: 1,
            inner_iter_y: 1,
            abs_tol: T::DEFAULT_ABS_TOL,
            rel_tol: T::DEFAULT_REL_TOL,
            min_stepsize: T::MIN_STEPSIZE_FRACTION * T::DEFAULT_STEPSIZE,
        }
    }
}

impl<T: Scalar> ProxGradParams<T> {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial step size. The step floor follows proportionally;
    /// call [`with_min_stepsize`](Self::with_min_stepsize) afterwards to
    /// override it.
    pub fn with_stepsize(mut self, stepsize: T) -> Self {
        self.stepsize = stepsize;
        self.min_stepsize = T::MIN_STEPSIZE_FRACTION * stepsize;
        self
    }

    /// Sets the maximum number of outer iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the number of X-phase passes per outer iteration.
    pub fn with_inner_iter_x(mut self, inner_iter_x: usize) -> Self {
        self.inner_iter_x = inner_iter_x;
        self
    }

    /// Sets the number of Y-phase passes per outer iteration.
    pub fn with_inner_iter_y(mut self, inner_iter_y: usize) -> Self {
        self.inner_iter_y = inner_iter_y;
        self
    }

    /// Raises both inner-iteration counts to at least `inner_iter`.
    pub fn with_inner_iter(mut self, inner_iter: usize) -> Self {
        self.inner_iter_x = self.inner_iter_x.max(inner_iter);
        self.inner_iter_y = self.inner_iter_y.max(inner_iter);
        self
    }

    /// Sets the absolute objective-decrease tolerance.
    pub fn with_abs_tol(mut self, abs_tol: T) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Sets the relative objective-decrease tolerance.
    pub fn with_rel_tol(mut self, rel_tol: T) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// Sets the step-size floor.
    pub fn with_min_stepsize(mut self, min_stepsize: T) -> Self {
        self.min_stepsize = min_stepsize;
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> SolverResult<()> {
        if self.stepsize <= T::zero() {
            return Err(FitError::invalid_configuration(
                "stepsize must be positive",
            ));
        }
        if self.min_stepsize <= T::zero() {
            return Err(FitError::invalid_configuration(
                "min_stepsize must be positive",
            ));
        }
        if self.min_stepsize >= self.stepsize {
            return Err(FitError::invalid_configuration(
                "min_stepsize must be below the initial stepsize",
            ));
        }
        if self.inner_iter_x == 0 || self.inner_iter_y == 0 {
            return Err(FitError::invalid_configuration(
                "inner iteration counts must be at least 1",
            ));
        }
        if self.abs_tol <= T::zero() || self.rel_tol <= T::zero() {
            return Err(FitError::invalid_configuration(
                "tolerances must be positive",
            ));
        }
        Ok(())
    }
}
