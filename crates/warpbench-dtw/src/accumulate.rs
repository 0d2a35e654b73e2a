//! Accumulated-cost dynamic programming, unbounded or banded.

use std::ops::Range;

use tracing::{debug, instrument};

use crate::constraint::BandConstraint;
use crate::cost::{CostMatrix, MatrixView};
use crate::error::DtwError;
use crate::total::TotalCost;

/// A move from a cell to one of its three DP predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `(i-1, j-1)`
    Diagonal,
    /// `(i-1, j)`
    Vertical,
    /// `(i, j-1)`
    Horizontal,
}

impl Step {
    /// Tie-break order used by both accumulation and backtracking. When two
    /// predecessors hold equal accumulated cost, the earlier entry wins.
    pub const PRIORITY: [Step; 3] = [Step::Diagonal, Step::Vertical, Step::Horizontal];

    /// Return the predecessor of `(row, col)` along this step, or `None` if it
    /// would leave the matrix.
    #[must_use]
    pub fn predecessor(self, row: usize, col: usize) -> Option<(usize, usize)> {
        match self {
            Self::Diagonal => Some((row.checked_sub(1)?, col.checked_sub(1)?)),
            Self::Vertical => Some((row.checked_sub(1)?, col)),
            Self::Horizontal => Some((row, col.checked_sub(1)?)),
        }
    }
}

/// Select the minimum of `[diagonal, vertical, horizontal]` honouring
/// [`Step::PRIORITY`] on ties.
#[inline]
pub(crate) fn select(candidates: [f64; 3]) -> (f64, Step) {
    let mut best = (candidates[0], Step::PRIORITY[0]);
    for (&value, &step) in candidates.iter().zip(&Step::PRIORITY).skip(1) {
        if value < best.0 {
            best = (value, step);
        }
    }
    best
}

/// Read column `j` from a row stored over `span`; out-of-span reads are infinite.
#[inline]
pub(crate) fn span_value(values: &[f64], span: &Range<usize>, j: usize) -> f64 {
    if span.contains(&j) {
        values[j - span.start]
    } else {
        f64::INFINITY
    }
}

/// Accumulated-cost matrix, stored row-limited.
///
/// Each row keeps only the cells of its band span (the whole row when
/// unconstrained). Cells outside the span are unreachable and read as
/// `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedMatrix {
    rows: usize,
    cols: usize,
    constraint: BandConstraint,
    spans: Vec<Range<usize>>,
    offsets: Vec<usize>,
    data: Vec<f64>,
}

impl AccumulatedMatrix {
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

    /// Return the constraint this matrix was accumulated under.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Return the accumulated cost at `(row, col)`, `f64::INFINITY` if unreachable.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        assert!(col < self.cols, "column index {col} out of bounds for {} columns", self.cols);
        span_value(self.row_values(row), &self.spans[row], col)
    }

    /// Return the columns evaluated for `row`.
    #[must_use]
    pub fn span(&self, row: usize) -> Range<usize> {
        self.spans[row].clone()
    }

    /// Return the stored values of `row`, one per column of [`span`][Self::span].
    #[must_use]
    pub fn row_values(&self, row: usize) -> &[f64] {
        let start = self.offsets[row];
        &self.data[start..start + self.spans[row].len()]
    }

    /// Return the number of cells the recurrence evaluated.
    #[must_use]
    pub fn evaluated_cells(&self) -> usize {
        self.data.len()
    }

    /// Return the raw terminal value, which may be infinite under a band.
    #[must_use]
    pub fn terminal(&self) -> f64 {
        self.get(self.rows - 1, self.cols - 1)
    }

    /// Return true if the band connects the origin to the terminal cell.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.constraint
            .reaches(self.rows - 1, self.cols - 1, self.rows, self.cols)
    }

    /// Return the total alignment cost at the terminal cell.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InfeasibleBand`] | the band leaves the terminal unreachable |
    /// | [`DtwError::CostOverflow`] | the terminal is reachable but its cost exceeds `f64::MAX` |
    pub fn total_cost(&self) -> Result<TotalCost, DtwError> {
        TotalCost::from_terminal(self.terminal(), self.constraint, self.rows, self.cols)
    }

    /// Return the predecessor of `(row, col)` that produced its accumulated
    /// value, or `None` at the origin or when every predecessor is unreachable.
    #[must_use]
    pub fn best_predecessor(&self, row: usize, col: usize) -> Option<(Step, (usize, usize))> {
        let candidates = Step::PRIORITY.map(|step| {
            step.predecessor(row, col)
                .map_or(f64::INFINITY, |(r, c)| self.get(r, c))
        });
        let (value, step) = select(candidates);
        if value.is_finite() {
            step.predecessor(row, col).map(|cell| (step, cell))
        } else {
            None
        }
    }
}

impl MatrixView for AccumulatedMatrix {
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

/// Runs the DTW recurrence over a [`CostMatrix`].
///
/// ```text
/// accum[0][0] = cost[0][0]
/// accum[i][j] = cost[i][j] + min(accum[i-1][j-1], accum[i-1][j], accum[i][j-1])
/// ```
///
/// Missing predecessors (matrix edge or outside the band) count as infinite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accumulator {
    constraint: BandConstraint,
}

impl Accumulator {
    /// Create an accumulator for the given constraint.
    #[must_use]
    pub fn new(constraint: BandConstraint) -> Self {
        Self { constraint }
    }

    /// Create an accumulator that evaluates the full matrix.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(BandConstraint::Unconstrained)
    }

    /// Create an accumulator restricted to a Sakoe-Chiba band of radius `bound`.
    #[must_use]
    pub fn bounded(bound: usize) -> Self {
        Self::new(BandConstraint::SakoeChiba { bound })
    }

    /// Return the band constraint.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Accumulate `cost` in row-major order.
    ///
    /// Runs in O(nb * bw) time and space, where `bw` is the band width. The
    /// result is returned even when the terminal is unreachable; use
    /// [`AccumulatedMatrix::total_cost`] to observe infeasibility.
    #[must_use]
    #[instrument(skip_all, fields(rows = cost.rows(), cols = cost.cols(), constraint = %self.constraint))]
    pub fn accumulate(&self, cost: &CostMatrix) -> AccumulatedMatrix {
        let (rows, cols) = cost.shape();

        let spans: Vec<Range<usize>> = (0..rows)
            .map(|i| self.constraint.column_range(i, rows, cols))
            .collect();
        let mut offsets = Vec::with_capacity(rows);
        let mut total = 0;
        for span in &spans {
            offsets.push(total);
            total += span.len();
        }

        let mut data = vec![f64::INFINITY; total];

        for i in 0..rows {
            let span = &spans[i];
            let (done, rest) = data.split_at_mut(offsets[i]);
            let curr = &mut rest[..span.len()];
            let prev: Option<(&[f64], &Range<usize>)> =
                (i > 0).then(|| (&done[offsets[i - 1]..], &spans[i - 1]));
            let cost_row = cost.row(i);

            for j in span.clone() {
                let local = j - span.start;
                let c = cost_row[j];

                if i == 0 && j == 0 {
                    curr[local] = c;
                    continue;
                }

                let (diag, above) = match prev {
                    Some((values, prev_span)) => (
                        if j > 0 { span_value(values, prev_span, j - 1) } else { f64::INFINITY },
                        span_value(values, prev_span, j),
                    ),
                    None => (f64::INFINITY, f64::INFINITY),
                };
                let left = if local > 0 { curr[local - 1] } else { f64::INFINITY };

                curr[local] = c + select([diag, above, left]).0;
            }
        }

        let matrix = AccumulatedMatrix {
            rows,
            cols,
            constraint: self.constraint,
            spans,
            offsets,
            data,
        };
        debug!(
            evaluated = matrix.evaluated_cells(),
            feasible = matrix.is_feasible(),
            "accumulation complete"
        );
        matrix
    }
}
