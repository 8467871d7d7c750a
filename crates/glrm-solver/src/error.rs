//! Error types for the proximal-gradient solver.

use glrm_core::GlrmError;
use thiserror::Error;

/// Errors that can occur while configuring or running a fit.
#[derive(Debug, Clone, Error)]
pub enum FitError {
    /// Invalid solver configuration.
    ///
    /// This error occurs when the solver parameters are inconsistent,
    /// such as a non-positive step size or a step floor above the initial
    /// step.
    #[error("Invalid solver configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
    },

    /// Propagated model error.
    #[error("Model error: {0}")]
    Model(#[from] GlrmError),
}

impl FitError {
    /// Create an InvalidConfiguration error with a custom reason.
    pub fn invalid_configuration<S: Into<String>>(reason: S) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result type alias for solver operations.
pub type SolverResult<T> = std::result::Result<T, FitError>;
