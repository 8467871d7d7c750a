//! Convergence history of a fit.

use crate::types::Scalar;

/// Append-only record of (elapsed seconds, objective) pairs, one per outer
/// iteration plus the initial evaluation.
///
/// The solver's stopping rule reads only the last two objectives, so the
/// history must receive exactly one entry per outer iteration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceHistory<T: Scalar> {
    times: Vec<f64>,
    objectives: Vec<T>,
}

impl<T: Scalar> ConvergenceHistory<T> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            objectives: Vec::new(),
        }
    }

    /// Appends one (elapsed seconds, objective) entry.
    pub fn append(&mut self, elapsed_secs: f64, objective: T) {
        self.times.push(elapsed_secs);
        self.objectives.push(objective);
    }

    /// The most recent objective, if any entry exists.
    pub fn last_objective(&self) -> Option<T> {
        self.objectives.last().copied()
    }

    /// The objective before the most recent one.
    pub fn second_last_objective(&self) -> Option<T> {
        let n = self.objectives.len();
        if n >= 2 {
            Some(self.objectives[n - 2])
        } else {
            None
        }
    }

    /// Recorded objectives, oldest first.
    pub fn objectives(&self) -> &[T] {
        &self.objectives
    }

    /// Recorded elapsed times in seconds, oldest first.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// True if no entry has been recorded.
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }
}
