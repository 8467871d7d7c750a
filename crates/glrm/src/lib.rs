//! Generalized low-rank models in Rust.
//!
//! A generalized low-rank model (GLRM) approximates an m x n data table,
//! possibly with missing entries, by the product of two rank-k factors
//! under per-column losses and per-row/per-column regularizers. This
//! facade re-exports the model types from `glrm-core` and the alternating
//! proximal-gradient solver from `glrm-solver`.
//!
//! # Quick start
//!
//! ```
//! use glrm::prelude::*;
//!
//! let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
//! let mut model = Glrm::new(
//!     a,
//!     vec![Loss::Quadratic; 2],
//!     vec![Regularizer::Zero; 3],
//!     vec![Regularizer::Zero; 2],
//!     1,
//! )?;
//! let result = fit(&mut model, &ProxGradParams::new().with_max_iter(100))?;
//! println!("objective {} after {} iterations", result.objective, result.iterations);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use glrm_core::{error, history, loss, model, observation, regularizer, types};
pub use glrm_solver::{fit, FitError, FitResult, ProxGradParams, SolverResult, TerminationReason};

// Re-export the linear algebra backend.
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use glrm_core::prelude::*;
    pub use glrm_solver::{
        fit, FitError, FitResult, ProxGradParams, SolverResult, TerminationReason,
    };
}
