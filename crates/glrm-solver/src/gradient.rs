//! Gradient engine for the alternating phases.
//!
//! Computes the full gradients of the observed-entry losses with respect
//! to both factors from the current factor product. Work is partitioned by
//! column group (one unit per loss), which makes the `gy` destinations
//! disjoint. Contributions to `gx` cross group boundaries, so each worker
//! emits them as a scatter list of (example, k-vector) pairs merged in a
//! serial reduction pass afterwards; the merged sum equals the serial
//! accumulation up to floating-point reassociation.

use glrm_core::model::Glrm;
use glrm_core::types::{DMatrix, DVector, Scalar};
use rayon::prelude::*;

/// Partial gradients produced by one column-group worker.
struct GroupGradient<T: Scalar> {
    j: usize,
    /// dL/dY restricted to this group's columns, k x w.
    gy_block: DMatrix<T>,
    /// dL/dX contributions of this group, one k-vector per observed row.
    gx_scatter: Vec<(usize, DVector<T>)>,
}

/// Overwrites `gx` (k x m) and `gy` (k x d) with the loss gradients at the
/// current factors, given the factor product (d x m, one prediction column
/// per example).
///
/// Only observed entries contribute; a column with no observations leaves
/// its `gy` block zero.
pub(crate) fn compute_gradients<T: Scalar>(
    model: &Glrm<T>,
    product: &DMatrix<T>,
    gx: &mut DMatrix<T>,
    gy: &mut DMatrix<T>,
) {
    debug_assert_eq!(product.shape(), (model.embedding_dim(), model.nrows()));
    debug_assert_eq!(gx.shape(), model.x.shape());
    debug_assert_eq!(gy.shape(), model.y.shape());

    let k = model.rank();
    let groups: Vec<GroupGradient<T>> = (0..model.ncols())
        .into_par_iter()
        .map(|j| {
            let (offset, width) = model.column_group(j);
            let loss = &model.losses()[j];
            let y_block = model.y.columns(offset, width);
            let observed = model.index().observed_examples(j);

            let mut gy_block = DMatrix::zeros(k, width);
            let mut gx_scatter = Vec::with_capacity(observed.len());
            let mut u = DVector::zeros(width);
            let mut g = DVector::zeros(width);
            for &i in observed {
                u.copy_from(&product.column(i).rows(offset, width));
                loss.gradient_into(&u, model.data()[(i, j)], &mut g);
                // gy_j += x_i g', gx_i += Y_j g
                gy_block.ger(T::one(), &model.x.column(i), &g, T::one());
                let mut contribution = DVector::zeros(k);
                contribution.gemv(T::one(), &y_block, &g, T::zero());
                gx_scatter.push((i, contribution));
            }
            GroupGradient {
                j,
                gy_block,
                gx_scatter,
            }
        })
        .collect();

    gx.fill(T::zero());
    gy.fill(T::zero());
    for group in groups {
        let (offset, width) = model.column_group(group.j);
        gy.columns_mut(offset, width).copy_from(&group.gy_block);
        for (i, contribution) in group.gx_scatter {
            gx.column_mut(i).axpy(T::one(), &contribution, T::one());
        }
    }
}
