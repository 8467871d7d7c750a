//! Two-sided index of the observed entries of the data table.
//!
//! The solver traverses observations along both axes: per column while
//! accumulating `Y` gradients, per row while accumulating `X` gradients and
//! evaluating row objectives. The index stores both orientations, sorted
//! and deduplicated, so each phase can iterate its own axis directly.

use crate::error::{GlrmError, Result};

/// Sorted, two-sided observation index for an m x n data table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationIndex {
    /// For each row i, the sorted columns with an observed entry.
    observed_features: Vec<Vec<usize>>,
    /// For each column j, the sorted rows with an observed entry.
    observed_examples: Vec<Vec<usize>>,
    /// Total number of observed entries.
    nobs: usize,
}

impl ObservationIndex {
    /// Builds the index for a table with no missing entries.
    pub fn fully_observed(nrows: usize, ncols: usize) -> Self {
        let observed_features = vec![(0..ncols).collect::<Vec<_>>(); nrows];
        let observed_examples = vec![(0..nrows).collect::<Vec<_>>(); ncols];
        Self {
            observed_features,
            observed_examples,
            nobs: nrows * ncols,
        }
    }

    /// Builds the index from explicit (row, column) pairs.
    ///
    /// Duplicate pairs are collapsed. Returns an error if any pair lies
    /// outside the table.
    pub fn from_pairs(nrows: usize, ncols: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut observed_features = vec![Vec::new(); nrows];
        let mut observed_examples = vec![Vec::new(); ncols];
        for &(i, j) in pairs {
            if i >= nrows || j >= ncols {
                return Err(GlrmError::invalid_observation(i, j, nrows, ncols));
            }
            observed_features[i].push(j);
            observed_examples[j].push(i);
        }
        for row in &mut observed_features {
            row.sort_unstable();
            row.dedup();
        }
        let mut nobs = 0;
        for col in &mut observed_examples {
            col.sort_unstable();
            col.dedup();
            nobs += col.len();
        }
        Ok(Self {
            observed_features,
            observed_examples,
            nobs,
        })
    }

    /// Sorted columns observed in row `i`.
    pub fn observed_features(&self, i: usize) -> &[usize] {
        &self.observed_features[i]
    }

    /// Sorted rows observed in column `j`.
    pub fn observed_examples(&self, j: usize) -> &[usize] {
        &self.observed_examples[j]
    }

    /// Number of rows indexed.
    pub fn nrows(&self) -> usize {
        self.observed_features.len()
    }

    /// Number of columns indexed.
    pub fn ncols(&self) -> usize {
        self.observed_examples.len()
    }

    /// Total number of observed entries.
    pub fn len(&self) -> usize {
        self.nobs
    }

    /// True if no entry is observed.
    pub fn is_empty(&self) -> bool {
        self.nobs == 0
    }
}
