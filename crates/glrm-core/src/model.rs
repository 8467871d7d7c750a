//! The generalized low-rank model container.
//!
//! A [`Glrm`] bundles the observed data table, the per-column loss
//! assignment, the per-row and per-column regularizers, the observation
//! index and the two factor matrices. The solver mutates `x` and `y` in
//! place during fitting; everything else is read-only model structure.
//!
//! Shapes follow the usual GLRM convention: for an m x n table and rank k,
//! `x` is k x m (one column per example) and `y` is k x d, where d is the
//! total embedding width of the loss assignment (d >= n when categorical
//! losses are present). Column j of the table owns the contiguous block
//! of `y` columns starting at `offsets()[j]`.

use crate::error::{GlrmError, Result};
use crate::loss::Loss;
use crate::observation::ObservationIndex;
use crate::regularizer::Regularizer;
use crate::types::{DMatrix, DVector, Scalar};
use rand::Rng;
use rand_distr::StandardNormal;

/// A generalized low-rank model: data, losses, regularizers and factors.
#[derive(Debug, Clone)]
pub struct Glrm<T: Scalar> {
    /// Example factor, k x m. Column i embeds example i.
    pub x: DMatrix<T>,
    /// Feature factor, k x d. Feature j owns columns
    /// `offsets()[j] .. offsets()[j] + losses()[j].embedding_dim()`.
    pub y: DMatrix<T>,
    a: DMatrix<T>,
    losses: Vec<Loss<T>>,
    rx: Vec<Regularizer<T>>,
    ry: Vec<Regularizer<T>>,
    k: usize,
    index: ObservationIndex,
    offsets: Vec<usize>,
    embedding_dim: usize,
}

impl<T: Scalar> Glrm<T> {
    /// Builds a model over a fully observed table.
    ///
    /// Requires one loss and one column regularizer per data column, one
    /// row regularizer per data row, and a positive rank. Factors are
    /// initialized with standard Gaussian noise.
    pub fn new(
        a: DMatrix<T>,
        losses: Vec<Loss<T>>,
        rx: Vec<Regularizer<T>>,
        ry: Vec<Regularizer<T>>,
        k: usize,
    ) -> Result<Self> {
        let index = ObservationIndex::fully_observed(a.nrows(), a.ncols());
        Self::with_index(a, losses, rx, ry, k, index)
    }

    /// Like [`new`](Self::new), drawing the factor initialization from the
    /// given generator. Seed it for reproducible factors.
    pub fn new_with_rng<R: Rng>(
        a: DMatrix<T>,
        losses: Vec<Loss<T>>,
        rx: Vec<Regularizer<T>>,
        ry: Vec<Regularizer<T>>,
        k: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let index = ObservationIndex::fully_observed(a.nrows(), a.ncols());
        Self::with_index_rng(a, losses, rx, ry, k, index, rng)
    }

    /// Builds a model over a partially observed table, given the observed
    /// (row, column) pairs.
    pub fn from_pairs(
        a: DMatrix<T>,
        losses: Vec<Loss<T>>,
        rx: Vec<Regularizer<T>>,
        ry: Vec<Regularizer<T>>,
        k: usize,
        observed: &[(usize, usize)],
    ) -> Result<Self> {
        let index = ObservationIndex::from_pairs(a.nrows(), a.ncols(), observed)?;
        Self::with_index(a, losses, rx, ry, k, index)
    }

    /// Builds a model from a prebuilt observation index.
    pub fn with_index(
        a: DMatrix<T>,
        losses: Vec<Loss<T>>,
        rx: Vec<Regularizer<T>>,
        ry: Vec<Regularizer<T>>,
        k: usize,
        index: ObservationIndex,
    ) -> Result<Self> {
        Self::with_index_rng(a, losses, rx, ry, k, index, &mut rand::thread_rng())
    }

    /// Builds a model from a prebuilt observation index, drawing the
    /// factor initialization from the given generator.
    pub fn with_index_rng<R: Rng>(
        a: DMatrix<T>,
        losses: Vec<Loss<T>>,
        rx: Vec<Regularizer<T>>,
        ry: Vec<Regularizer<T>>,
        k: usize,
        index: ObservationIndex,
        rng: &mut R,
    ) -> Result<Self> {
        let (m, n) = (a.nrows(), a.ncols());
        if k == 0 {
            return Err(GlrmError::invalid_parameter("rank k must be positive"));
        }
        if losses.len() != n {
            return Err(GlrmError::dimension_mismatch(
                format!("{n} losses (one per column)"),
                losses.len(),
            ));
        }
        if rx.len() != m {
            return Err(GlrmError::dimension_mismatch(
                format!("{m} row regularizers"),
                rx.len(),
            ));
        }
        if ry.len() != n {
            return Err(GlrmError::dimension_mismatch(
                format!("{n} column regularizers"),
                ry.len(),
            ));
        }
        if index.nrows() != m || index.ncols() != n {
            return Err(GlrmError::dimension_mismatch(
                format!("{m}x{n} observation index"),
                format!("{}x{}", index.nrows(), index.ncols()),
            ));
        }

        // Observed targets must lie in their loss's domain.
        for (j, loss) in losses.iter().enumerate() {
            for &i in index.observed_examples(j) {
                let target = a[(i, j)];
                if !loss.admits_target(target) {
                    return Err(GlrmError::numerical_error(format!(
                        "target {target} at ({i}, {j}) is outside the domain of {loss:?}"
                    )));
                }
            }
        }

        let mut offsets = Vec::with_capacity(n);
        let mut embedding_dim = 0;
        for loss in &losses {
            offsets.push(embedding_dim);
            embedding_dim += loss.embedding_dim();
        }

        let x = gaussian_matrix(rng, k, m);
        let y = gaussian_matrix(rng, k, embedding_dim);

        Ok(Self {
            x,
            y,
            a,
            losses,
            rx,
            ry,
            k,
            index,
            offsets,
            embedding_dim,
        })
    }

    /// The observed data table.
    pub fn data(&self) -> &DMatrix<T> {
        &self.a
    }

    /// Per-column losses.
    pub fn losses(&self) -> &[Loss<T>] {
        &self.losses
    }

    /// Per-row regularizers.
    pub fn rx(&self) -> &[Regularizer<T>] {
        &self.rx
    }

    /// Per-column regularizers.
    pub fn ry(&self) -> &[Regularizer<T>] {
        &self.ry
    }

    /// Rank of the factorization.
    pub fn rank(&self) -> usize {
        self.k
    }

    /// Number of examples (rows of the table).
    pub fn nrows(&self) -> usize {
        self.a.nrows()
    }

    /// Number of features (columns of the table).
    pub fn ncols(&self) -> usize {
        self.a.ncols()
    }

    /// The observation index.
    pub fn index(&self) -> &ObservationIndex {
        &self.index
    }

    /// Starting column of each feature's block in `y`. The blocks are
    /// contiguous, ordered by feature, and tile `0..embedding_dim()`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Total embedding width d of the loss assignment.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// The column range of `y` owned by feature `j`.
    pub fn column_group(&self, j: usize) -> (usize, usize) {
        (self.offsets[j], self.losses[j].embedding_dim())
    }

    /// Local objective of row `i` at candidate embedding `v`: the losses
    /// of the row's observed entries evaluated against the current `y`,
    /// plus the row regularizer.
    pub fn row_objective(&self, i: usize, v: &DVector<T>) -> T {
        let mut total = T::zero();
        for &j in self.index.observed_features(i) {
            let (offset, width) = self.column_group(j);
            let u = self.y.columns(offset, width).tr_mul(v);
            total += self.losses[j].value(&u, self.a[(i, j)]);
        }
        total + self.rx[i].value(v)
    }

    /// Local objective of feature `j` at candidate block `block` (k x w):
    /// the losses of the column's observed entries evaluated against the
    /// current `x`, plus the column regularizer.
    pub fn col_objective(&self, j: usize, block: &DMatrix<T>) -> T {
        let mut total = T::zero();
        for &i in self.index.observed_examples(j) {
            let u = block.tr_mul(&self.x.column(i));
            total += self.losses[j].value(&u, self.a[(i, j)]);
        }
        total + self.ry[j].value(block)
    }

    /// Replaces `y` with scaled Gaussian noise of the shape implied by
    /// the loss assignment. Used to recover from a degenerate or
    /// mis-shaped `y` before fitting.
    pub fn reinit_y<R: Rng>(&mut self, rng: &mut R, scale: T) {
        let mut y = gaussian_matrix::<T, R>(rng, self.k, self.embedding_dim);
        for v in y.iter_mut() {
            *v *= scale;
        }
        self.y = y;
    }

    /// Full objective at the current factors: all observed losses plus
    /// every row and column regularizer.
    pub fn objective(&self) -> T {
        let mut total = T::zero();
        for i in 0..self.nrows() {
            total += self.row_objective(i, &self.x.column(i).clone_owned());
        }
        for (j, reg) in self.ry.iter().enumerate() {
            let (offset, width) = self.column_group(j);
            total += reg.value(&self.y.columns(offset, width));
        }
        total
    }
}

fn gaussian_matrix<T: Scalar, R: Rng>(rng: &mut R, nrows: usize, ncols: usize) -> DMatrix<T> {
    DMatrix::from_fn(nrows, ncols, |_, _| {
        <T as Scalar>::from_f64(rng.sample::<f64, _>(StandardNormal))
    })
}
