//! Pairwise elementwise cost matrix.

use std::ops::Index;

use rayon::prelude::*;
use tracing::instrument;

use crate::metric::Metric;
use crate::sequence::SequenceView;

/// Read-only access to a dense `rows x cols` grid of costs.
///
/// Implemented by [`CostMatrix`] and [`AccumulatedMatrix`][crate::AccumulatedMatrix]
/// so renderers can consume either without copying.
pub trait MatrixView {
    /// Number of rows (length of sequence B).
    fn n_rows(&self) -> usize;

    /// Number of columns (length of sequence A).
    fn n_cols(&self) -> usize;

    /// Value at `(row, col)`. Unreachable cells read as `f64::INFINITY`.
    fn value(&self, row: usize, col: usize) -> f64;
}

/// Dense `nb x na` matrix where `cost[i][j] = metric(b[i], a[j])`.
///
/// Stored row-major. Always fully populated; banding only affects accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build the cost matrix of `a` (columns) against `b` (rows).
    ///
    /// Rows are independent and are filled in parallel.
    #[must_use]
    #[instrument(skip_all, fields(na = a.len(), nb = b.len()))]
    pub fn build<M: Metric + ?Sized>(a: SequenceView<'_>, b: SequenceView<'_>, metric: &M) -> Self {
        let cols = a.len();
        let rows = b.len();
        let a = a.as_slice();
        let b = b.as_slice();

        let mut data = vec![0.0; rows * cols];
        data.par_chunks_mut(cols)
            .zip(b.par_iter())
            .for_each(|(row, &bi)| {
                for (cell, &aj) in row.iter_mut().zip(a) {
                    *cell = metric.cost(bi, aj);
                }
            });

        Self { rows, cols, data }
    }

    /// Create a matrix from row-major data. Used by tests and by callers that
    /// already hold a cost grid.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols` or either dimension is zero.
    #[must_use]
    pub fn from_rows(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert!(rows > 0 && cols > 0, "cost matrix must be non-empty");
        assert_eq!(data.len(), rows * cols, "data length does not match {rows}x{cols}");
        Self { rows, cols, data }
    }

    /// Return the number of rows (length of sequence B).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (length of sequence A).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Return the cost at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    /// Return row `i` as a slice of length `cols`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Return the transposed matrix, i.e. the cost matrix with A and B swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

impl MatrixView for CostMatrix {
    fn n_rows(&self) -> usize {
        self.rows
    }

    fn n_cols(&self) -> usize {
        self.cols
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.get(row, col)
    }
}
