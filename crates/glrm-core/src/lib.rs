//! Core types for generalized low-rank models.
//!
//! This crate provides the building blocks shared by the GLRM solver: the
//! scalar abstraction, the loss and regularizer library, the observation
//! index over partially observed tables, the model container and the
//! convergence history.
//!
//! # Key Concepts
//!
//! - **Factors**: an m x n table is approximated by X'Y with X of shape
//!   k x m and Y of shape k x d
//! - **Losses**: each column is penalized by its own loss; categorical
//!   losses span several columns of Y
//! - **Regularizers**: penalties with proximal operators, applied per row
//!   of X and per column block of Y
//! - **Observations**: missing entries are simply absent from the
//!   observation index and never touch the objective
//!
//! # Modules
//!
//! - [`error`]: Error types for model construction and evaluation
//! - [`history`]: Convergence history bookkeeping
//! - [`loss`]: Per-column loss functions
//! - [`model`]: The model container
//! - [`observation`]: Two-sided observed-entry index
//! - [`regularizer`]: Penalties with proximal operators
//! - [`types`]: Scalar trait and matrix aliases

pub mod error;
pub mod history;
pub mod loss;
pub mod model;
pub mod observation;
pub mod regularizer;
pub mod types;

pub use error::{GlrmError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use glrm_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{GlrmError, Result};
    pub use crate::history::ConvergenceHistory;
    pub use crate::loss::Loss;
    pub use crate::model::Glrm;
    pub use crate::observation::ObservationIndex;
    pub use crate::regularizer::Regularizer;
    pub use crate::types::{DMatrix, DVector, Scalar};
}
