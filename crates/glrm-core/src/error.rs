//! Error types for low-rank model construction and evaluation.

use thiserror::Error;

/// Errors that can occur while building or evaluating a low-rank model.
#[derive(Debug, Clone, Error)]
pub enum GlrmError {
    /// Dimension mismatch between model components.
    ///
    /// This error occurs when factors, losses or regularizers disagree on
    /// the shape of the problem.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },

    /// Observation index out of range of the data table.
    #[error("Observation ({row}, {col}) is outside the {nrows}x{ncols} data table")]
    InvalidObservation {
        /// Row index of the offending observation
        row: usize,
        /// Column index of the offending observation
        col: usize,
        /// Number of rows in the data table
        nrows: usize,
        /// Number of columns in the data table
        ncols: usize,
    },

    /// Numerical instability detected.
    ///
    /// This error occurs when a loss or proximal evaluation produces an
    /// invalid value, such as a NaN target or an out-of-domain class label.
    #[error("Numerical error: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl GlrmError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an InvalidObservation error.
    pub fn invalid_observation(row: usize, col: usize, nrows: usize, ncols: usize) -> Self {
        Self::InvalidObservation {
            row,
            col,
            nrows,
            ncols,
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce GlrmError.
pub type Result<T> = std::result::Result<T, GlrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GlrmError::dimension_mismatch("k x 6", "k x 4");
        assert!(matches!(err, GlrmError::DimensionMismatch { .. }));
        assert_eq!(err.to_string(), "Dimension mismatch: expected k x 6, got k x 4");

        let err = GlrmError::invalid_observation(5, 2, 3, 4);
        assert!(matches!(err, GlrmError::InvalidObservation { .. }));
        assert_eq!(
            err.to_string(),
            "Observation (5, 2) is outside the 3x4 data table"
        );
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            GlrmError::dimension_mismatch("3 columns", "5 columns"),
            GlrmError::invalid_parameter("rank must be positive"),
            GlrmError::invalid_observation(0, 9, 4, 4),
            GlrmError::numerical_error("target is NaN"),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
