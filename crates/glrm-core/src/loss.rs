//! Per-column loss functions.
//!
//! Every data column of a low-rank model is assigned one loss. A loss maps
//! a prediction block `u` (one row of the factor product, restricted to the
//! columns this loss spans) and the observed target `a` to a penalty value,
//! and exposes the gradient of that penalty with respect to `u`.
//!
//! Scalar losses span a single column of `Y` (`embedding_dim() == 1`);
//! the categorical loss spans one column per class. Losses form a closed
//! set of variants so the solver dispatches once per column group rather
//! than inspecting values per entry.

use crate::types::{DVector, Scalar};
use num_traits::Float;

/// Loss functions for observed entries of the data table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Loss<T: Scalar> {
    /// Squared error (u - a)^2 for real-valued columns.
    Quadratic,

    /// Absolute error |u - a|, robust to outliers.
    L1,

    /// Huber loss: quadratic within `crossover` of the target, linear
    /// beyond it.
    Huber {
        /// Transition point between the quadratic and linear regimes
        crossover: T,
    },

    /// Hinge loss max(1 - a*u, 0) for boolean columns with targets in
    /// {-1, +1}.
    Hinge,

    /// Logistic loss log(1 + exp(-a*u)) for boolean columns with targets
    /// in {-1, +1}.
    Logistic,

    /// One-vs-all hinge loss for categorical columns. The target is a
    /// class index in [0, classes); the prediction block holds one margin
    /// per class.
    Categorical {
        /// Number of classes; also the embedding width of this loss
        classes: usize,
    },
}

impl<T: Scalar> Loss<T> {
    /// Number of columns of `Y` this loss spans.
    pub fn embedding_dim(&self) -> usize {
        match self {
            Self::Categorical { classes } => *classes,
            _ => 1,
        }
    }

    /// Evaluates the loss at prediction block `u` with target `a`.
    ///
    /// `u` must have length `embedding_dim()`.
    pub fn value(&self, u: &DVector<T>, a: T) -> T {
        debug_assert_eq!(u.len(), self.embedding_dim());
        match self {
            Self::Quadratic => {
                let e = u[0] - a;
                e * e
            }
            Self::L1 => Float::abs(u[0] - a),
            Self::Huber { crossover } => {
                let e = u[0] - a;
                let abs_e = Float::abs(e);
                if abs_e <= *crossover {
                    e * e
                } else {
                    *crossover * (abs_e + abs_e - *crossover)
                }
            }
            Self::Hinge => Float::max(T::one() - a * u[0], T::zero()),
            Self::Logistic => softplus(-a * u[0]),
            Self::Categorical { classes } => {
                let target = to_class_index(a);
                let mut total = T::zero();
                for c in 0..*classes {
                    let sign = if c == target { T::one() } else { -T::one() };
                    total += Float::max(T::one() - sign * u[c], T::zero());
                }
                total
            }
        }
    }

    /// Writes the gradient of the loss with respect to `u` into `out`.
    ///
    /// Both `u` and `out` must have length `embedding_dim()`.
    pub fn gradient_into(&self, u: &DVector<T>, a: T, out: &mut DVector<T>) {
        debug_assert_eq!(u.len(), self.embedding_dim());
        debug_assert_eq!(out.len(), self.embedding_dim());
        match self {
            Self::Quadratic => {
                out[0] = (u[0] - a) + (u[0] - a);
            }
            Self::L1 => {
                out[0] = sign(u[0] - a);
            }
            Self::Huber { crossover } => {
                let e = u[0] - a;
                out[0] = if Float::abs(e) <= *crossover {
                    e + e
                } else {
                    (*crossover + *crossover) * sign(e)
                };
            }
            Self::Hinge => {
                out[0] = if a * u[0] >= T::one() { T::zero() } else { -a };
            }
            Self::Logistic => {
                // d/du log(1 + exp(-a u)) = -a / (1 + exp(a u))
                out[0] = -a / (T::one() + Float::exp(a * u[0]));
            }
            Self::Categorical { classes } => {
                let target = to_class_index(a);
                for c in 0..*classes {
                    let sign = if c == target { T::one() } else { -T::one() };
                    out[c] = if sign * u[c] >= T::one() {
                        T::zero()
                    } else {
                        -sign
                    };
                }
            }
        }
    }

    /// True if the target is within the loss's domain.
    ///
    /// Boolean losses expect targets in {-1, +1}; the categorical loss
    /// expects a non-negative integer below its class count. Real-valued
    /// losses accept any finite target.
    pub fn admits_target(&self, a: T) -> bool {
        if !Float::is_finite(a) {
            return false;
        }
        match self {
            Self::Hinge | Self::Logistic => a == T::one() || a == -T::one(),
            Self::Categorical { classes } => {
                let rounded = Float::round(a);
                rounded == a && a >= T::zero() && to_class_index(a) < *classes
            }
            _ => true,
        }
    }
}

fn to_class_index<T: Scalar>(a: T) -> usize {
    a.to_f64() as usize
}

fn sign<T: Scalar>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else if x < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

/// Numerically stable log(1 + exp(x)).
fn softplus<T: Scalar>(x: T) -> T {
    if x > T::zero() {
        x + Float::ln_1p(Float::exp(-x))
    } else {
        Float::ln_1p(Float::exp(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grad(loss: &Loss<f64>, u: &[f64], a: f64) -> DVector<f64> {
        let u = DVector::from_row_slice(u);
        let mut out = DVector::zeros(u.len());
        loss.gradient_into(&u, a, &mut out);
        out
    }

    #[test]
    fn test_quadratic() {
        let loss = Loss::<f64>::Quadratic;
        let u = DVector::from_element(1, 3.0);
        assert_relative_eq!(loss.value(&u, 1.0), 4.0);
        assert_relative_eq!(grad(&loss, &[3.0], 1.0)[0], 4.0);
        assert_relative_eq!(grad(&loss, &[1.0], 1.0)[0], 0.0);
    }

    #[test]
    fn test_l1() {
        let loss = Loss::<f64>::L1;
        let u = DVector::from_element(1, -2.0);
        assert_relative_eq!(loss.value(&u, 1.0), 3.0);
        assert_relative_eq!(grad(&loss, &[-2.0], 1.0)[0], -1.0);
        assert_relative_eq!(grad(&loss, &[1.0], 1.0)[0], 0.0);
    }

    #[test]
    fn test_huber_regimes() {
        let loss = Loss::Huber { crossover: 1.0_f64 };
        // Quadratic inside the crossover
        let u = DVector::from_element(1, 0.5);
        assert_relative_eq!(loss.value(&u, 0.0), 0.25);
        assert_relative_eq!(grad(&loss, &[0.5], 0.0)[0], 1.0);
        // Linear outside
        let u = DVector::from_element(1, 3.0);
        assert_relative_eq!(loss.value(&u, 0.0), 1.0 * (6.0 - 1.0));
        assert_relative_eq!(grad(&loss, &[3.0], 0.0)[0], 2.0);
        assert_relative_eq!(grad(&loss, &[-3.0], 0.0)[0], -2.0);
    }

    #[test]
    fn test_hinge() {
        let loss = Loss::<f64>::Hinge;
        let u = DVector::from_element(1, 0.5);
        assert_relative_eq!(loss.value(&u, 1.0), 0.5);
        assert_relative_eq!(grad(&loss, &[0.5], 1.0)[0], -1.0);
        // Margin satisfied: zero loss, zero gradient
        let u = DVector::from_element(1, 2.0);
        assert_relative_eq!(loss.value(&u, 1.0), 0.0);
        assert_relative_eq!(grad(&loss, &[2.0], 1.0)[0], 0.0);
    }

    #[test]
    fn test_logistic() {
        let loss = Loss::<f64>::Logistic;
        let u = DVector::from_element(1, 0.0);
        assert_relative_eq!(loss.value(&u, 1.0), (2.0_f64).ln());
        assert_relative_eq!(grad(&loss, &[0.0], 1.0)[0], -0.5);
        // Large correct margin: loss and gradient vanish
        let u = DVector::from_element(1, 50.0);
        assert!(loss.value(&u, 1.0) < 1e-20);
        assert!(grad(&loss, &[50.0], 1.0)[0].abs() < 1e-20);
    }

    #[test]
    fn test_categorical() {
        let loss = Loss::Categorical { classes: 3 };
        assert_eq!(loss.embedding_dim(), 3);

        // Perfect separation: target margin above 1, others below -1
        let u = DVector::from_row_slice(&[-2.0, 2.0, -2.0]);
        assert_relative_eq!(loss.value(&u, 1.0), 0.0);
        let g = grad(&loss, &[-2.0, 2.0, -2.0], 1.0);
        assert_relative_eq!(g.norm(), 0.0);

        // All margins at zero: hinge active everywhere
        let u = DVector::zeros(3);
        assert_relative_eq!(loss.value(&u, 1.0), 3.0);
        let g = grad(&loss, &[0.0, 0.0, 0.0], 1.0);
        assert_relative_eq!(g[0], 1.0);
        assert_relative_eq!(g[1], -1.0);
        assert_relative_eq!(g[2], 1.0);
    }

    #[test]
    fn test_admits_target() {
        assert!(Loss::<f64>::Quadratic.admits_target(-17.5));
        assert!(!Loss::<f64>::Quadratic.admits_target(f64::NAN));
        assert!(Loss::<f64>::Hinge.admits_target(-1.0));
        assert!(!Loss::<f64>::Hinge.admits_target(0.0));
        let cat = Loss::Categorical { classes: 3 };
        assert!(cat.admits_target(2.0));
        assert!(!cat.admits_target(3.0));
        assert!(!cat.admits_target(1.5));
    }

    #[test]
    fn test_embedding_dims() {
        assert_eq!(Loss::<f64>::Quadratic.embedding_dim(), 1);
        assert_eq!(Loss::<f64>::Logistic.embedding_dim(), 1);
        assert_eq!(Loss::<f64>::Categorical { classes: 5 }.embedding_dim(), 5);
    }
}
