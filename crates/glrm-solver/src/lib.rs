//! Alternating proximal-gradient solver for generalized low-rank models.
//!
//! Given a [`Glrm`](glrm_core::model::Glrm) (data, losses, regularizers
//! and factors), [`fit`] alternates proximal-gradient phases over the
//! example factor `X` and the feature factor `Y` until the objective
//! decrease falls below tolerance or the iteration budget runs out. Every
//! row and column carries its own backtracking step size that persists
//! across outer iterations.
//!
//! # Example
//!
//! ```
//! use glrm_core::prelude::*;
//! use glrm_solver::{fit, ProxGradParams};
//!
//! let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
//! let mut model = Glrm::new(
//!     a,
//!     vec![Loss::Quadratic; 2],
//!     vec![Regularizer::Zero; 3],
//!     vec![Regularizer::Zero; 2],
//!     1,
//! )?;
//! let result = fit(&mut model, &ProxGradParams::new().with_max_iter(50))?;
//! assert_eq!(result.history.len(), result.iterations + 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod fit;
pub mod params;

mod gradient;
mod line_search;

pub use error::{FitError, SolverResult};
pub use fit::{fit, FitResult, TerminationReason};
pub use params::ProxGradParams;
