//! Type definitions and aliases for low-rank model fitting.
//!
//! This module provides the scalar abstraction shared by every numerical
//! routine in the workspace, together with matrix/vector aliases.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in model fitting (f32 or f64).
///
/// This trait combines the numeric traits required by the proximal-gradient
/// solver and the loss/regularizer library.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default initial step size for the per-unit line search.
    const DEFAULT_STEPSIZE: Self;

    /// Default absolute objective-decrease tolerance (scaled by the number
    /// of observed entries).
    const DEFAULT_ABS_TOL: Self;

    /// Default relative objective-decrease tolerance.
    const DEFAULT_REL_TOL: Self;

    /// Fraction of the initial step size used as the default step floor.
    const MIN_STEPSIZE_FRACTION: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_from_f64` for a
    /// non-panicking version.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Try to convert from f64.
    fn try_from_f64(v: f64) -> Option<Self> {
        <Self as FromPrimitive>::from_f64(v)
    }

    /// Convert to f64 (for logging/display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_to_f64` for a non-panicking
    /// version.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Try to convert to f64.
    fn try_to_f64(self) -> Option<f64> {
        num_traits::cast(self)
    }

    /// Convert from usize (for observation counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_STEPSIZE: Self = 1.0;
    const DEFAULT_ABS_TOL: Self = 1e-3;
    const DEFAULT_REL_TOL: Self = 1e-5;
    const MIN_STEPSIZE_FRACTION: Self = 0.01;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_STEPSIZE: Self = 1.0;
    const DEFAULT_ABS_TOL: Self = 1e-5;
    const DEFAULT_REL_TOL: Self = 1e-9;
    const MIN_STEPSIZE_FRACTION: Self = 0.01;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;
