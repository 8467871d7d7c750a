//! Regularizers with proximal operators.
//!
//! A regularizer penalizes one unit of the factorization: a single column
//! of `X` (one example) or one column block of `Y` (one feature). Each
//! variant exposes its penalty value and its proximal operator
//! prox_r(v0, s) = argmin_v [ r(v) + (1/2s)||v - v0||^2 ], the workhorse of
//! the backtracking proximal-gradient step. Both operations are generic
//! over nalgebra storage so they apply to k-vectors and k×w blocks alike.

use crate::types::Scalar;
use nalgebra::{Dim, Matrix, RawStorage, RawStorageMut};
use num_traits::Float;

/// Regularization penalties on factor units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Regularizer<T: Scalar> {
    /// No penalty; the proximal operator is the identity.
    Zero,

    /// Squared-norm penalty scale * ||v||^2 with multiplicative shrinkage
    /// prox.
    Quadratic {
        /// Penalty weight
        scale: T,
    },

    /// L1 penalty scale * ||v||_1 with soft-threshold prox, inducing
    /// sparse factors.
    L1 {
        /// Penalty weight
        scale: T,
    },

    /// Indicator of the non-negative orthant; the prox is the projection
    /// max(v, 0) and the value is +inf on infeasible input.
    NonNegative,
}

impl<T: Scalar> Regularizer<T> {
    /// Evaluates the penalty at `v`.
    pub fn value<R, C, S>(&self, v: &Matrix<T, R, C, S>) -> T
    where
        R: Dim,
        C: Dim,
        S: RawStorage<T, R, C>,
    {
        match self {
            Self::Zero => T::zero(),
            Self::Quadratic { scale } => {
                let mut total = T::zero();
                for x in v.iter() {
                    total += *x * *x;
                }
                *scale * total
            }
            Self::L1 { scale } => {
                let mut total = T::zero();
                for x in v.iter() {
                    total += Float::abs(*x);
                }
                *scale * total
            }
            Self::NonNegative => {
                if v.iter().all(|x| *x >= T::zero()) {
                    T::zero()
                } else {
                    T::infinity()
                }
            }
        }
    }

    /// Applies the proximal operator with parameter `step` to `v` in place.
    pub fn prox<R, C, S>(&self, v: &mut Matrix<T, R, C, S>, step: T)
    where
        R: Dim,
        C: Dim,
        S: RawStorageMut<T, R, C>,
    {
        match self {
            Self::Zero => {}
            Self::Quadratic { scale } => {
                let two = T::one() + T::one();
                let shrink = T::one() / (T::one() + two * *scale * step);
                for x in v.iter_mut() {
                    *x *= shrink;
                }
            }
            Self::L1 { scale } => {
                let threshold = *scale * step;
                for x in v.iter_mut() {
                    *x = soft_threshold(*x, threshold);
                }
            }
            Self::NonNegative => {
                for x in v.iter_mut() {
                    if *x < T::zero() {
                        *x = T::zero();
                    }
                }
            }
        }
    }
}

fn soft_threshold<T: Scalar>(x: T, threshold: T) -> T {
    if x > threshold {
        x - threshold
    } else if x < -threshold {
        x + threshold
    } else {
        T::zero()
    }
}
