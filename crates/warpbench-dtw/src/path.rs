//! Warping path types and backtracking.

use std::iter::FusedIterator;

use tracing::instrument;

use crate::accumulate::{AccumulatedMatrix, Step};
use crate::cost::CostMatrix;
use crate::error::DtwError;

/// A single cell of a warping path: `row` indexes sequence B, `col` indexes
/// sequence A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpingStep {
    /// Index in sequence B.
    pub row: usize,
    /// Index in sequence A.
    pub col: usize,
}

impl WarpingStep {
    /// Create a step at `(row, col)`.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for WarpingStep {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<WarpingStep> for (usize, usize) {
    fn from(step: WarpingStep) -> Self {
        (step.row, step.col)
    }
}

/// An ordered sequence of cells from the terminal `(nb-1, na-1)` back to `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a path from cells ordered terminal to origin.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the cells, terminal first.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the cells origin first.
    pub fn forward(&self) -> impl DoubleEndedIterator<Item = &WarpingStep> + '_ {
        self.0.iter().rev()
    }

    /// Consume the path and return its cells origin first.
    #[must_use]
    pub fn into_forward(mut self) -> Vec<WarpingStep> {
        self.0.reverse();
        self.0
    }

    /// Return the move taken between each pair of consecutive cells, or `None`
    /// for a pair that is not a single DTW step.
    pub fn moves(&self) -> impl Iterator<Item = Option<Step>> + '_ {
        self.0.windows(2).map(|pair| {
            Step::PRIORITY
                .into_iter()
                .find(|step| step.predecessor(pair[0].row, pair[0].col) == Some((pair[1].row, pair[1].col)))
        })
    }

    /// Sum the cost of every cell on the path.
    ///
    /// For an extracted path this equals the terminal accumulated cost.
    #[must_use]
    pub fn cost_along(&self, cost: &CostMatrix) -> f64 {
        // Origin first, matching the order the recurrence adds costs in.
        self.forward().map(|s| cost.get(s.row, s.col)).sum()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Backtracks optimal warping paths over a cost / accumulated matrix pair.
#[derive(Debug, Clone, Copy)]
pub struct PathExtractor<'a> {
    cost: &'a CostMatrix,
    accum: &'a AccumulatedMatrix,
}

impl<'a> PathExtractor<'a> {
    /// Pair a cost matrix with the accumulated matrix built from it.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::ShapeMismatch`] if the shapes differ.
    pub fn new(cost: &'a CostMatrix, accum: &'a AccumulatedMatrix) -> Result<Self, DtwError> {
        if cost.shape() != accum.shape() {
            return Err(DtwError::ShapeMismatch {
                cost_rows: cost.rows(),
                cost_cols: cost.cols(),
                accum_rows: accum.rows(),
                accum_cols: accum.cols(),
            });
        }
        Ok(Self { cost, accum })
    }

    /// Start a lazy backtrace at the terminal cell.
    ///
    /// # Errors
    ///
    /// See [`backtrace_from`][Self::backtrace_from].
    pub fn backtrace(&self) -> Result<Backtrace<'a>, DtwError> {
        self.backtrace_from(self.accum.rows() - 1, self.accum.cols() - 1)
    }

    /// Start a lazy backtrace at `(row, col)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::UnreachableCell`] | the cell is outside the matrix or the band |
    /// | [`DtwError::CostOverflow`] | the cell is reachable but its cost exceeds `f64::MAX` |
    pub fn backtrace_from(&self, row: usize, col: usize) -> Result<Backtrace<'a>, DtwError> {
        let (rows, cols) = self.accum.shape();
        if row >= rows || col >= cols {
            return Err(DtwError::UnreachableCell { row, col });
        }
        if !self.accum.get(row, col).is_finite() {
            return Err(if self.accum.constraint().reaches(row, col, rows, cols) {
                DtwError::CostOverflow { row, col }
            } else {
                DtwError::UnreachableCell { row, col }
            });
        }
        Ok(Backtrace {
            cost: self.cost,
            accum: self.accum,
            next: Some((row, col)),
        })
    }

    /// Collect the optimal path from the terminal cell to the origin.
    ///
    /// # Errors
    ///
    /// See [`backtrace_from`][Self::backtrace_from].
    #[instrument(skip_all, fields(rows = self.accum.rows(), cols = self.accum.cols()))]
    pub fn extract(&self) -> Result<WarpingPath, DtwError> {
        Ok(WarpingPath::new(self.backtrace()?.collect()))
    }

    /// Collect the optimal path from `(row, col)` to the origin.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::UnreachableCell`] if the start cell is unreachable.
    pub fn extract_from(&self, row: usize, col: usize) -> Result<WarpingPath, DtwError> {
        Ok(WarpingPath::new(self.backtrace_from(row, col)?.collect()))
    }
}

/// Lazy backtrace from a reachable cell to the origin.
///
/// Yields cells in terminal-to-origin order. Call [`PathExtractor::backtrace`]
/// again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Backtrace<'a> {
    cost: &'a CostMatrix,
    accum: &'a AccumulatedMatrix,
    next: Option<(usize, usize)>,
}

impl Iterator for Backtrace<'_> {
    type Item = WarpingStep;

    fn next(&mut self) -> Option<Self::Item> {
        let (row, col) = self.next?;
        self.next = if row == 0 && col == 0 {
            None
        } else {
            let pred = self.accum.best_predecessor(row, col);
            debug_assert!(pred.is_some(), "reachable cell ({row}, {col}) has no finite predecessor");
            debug_assert!(pred.is_none_or(|(_, (r, c))| {
                self.cost.get(row, col) + self.accum.get(r, c) == self.accum.get(row, col)
            }));
            pred.map(|(_, cell)| cell)
        };
        Some(WarpingStep { row, col })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            // Each step decreases row + col by one or two.
            Some((row, col)) => (row.max(col) + 1, Some(row + col + 1)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Backtrace<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::Accumulator;
    use crate::metric::CostMetric;
    use crate::sequence::Sequence;

    fn matrices(a: Vec<f64>, b: Vec<f64>, acc: Accumulator) -> (CostMatrix, AccumulatedMatrix) {
        let a = Sequence::new(a).unwrap();
        let b = Sequence::new(b).unwrap();
        let cost = CostMatrix::build(a.as_view(), b.as_view(), &CostMetric::Absolute);
        let accum = acc.accumulate(&cost);
        (cost, accum)
    }

    fn cells(path: &WarpingPath) -> Vec<(usize, usize)> {
        path.steps().iter().map(|&s| s.into()).collect()
    }

    #[test]
    fn zeros_follow_diagonal() {
        let (cost, accum) = matrices(vec![0.0; 3], vec![0.0; 3], Accumulator::unbounded());
        let path = PathExtractor::new(&cost, &accum).unwrap().extract().unwrap();
        assert_eq!(cells(&path), vec![(2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn reversed_ramp_path() {
        // accum rows: [2,3,3] [3,2,3] [3,3,4]
        let (cost, accum) = matrices(vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0], Accumulator::unbounded());
        let path = PathExtractor::new(&cost, &accum).unwrap().extract().unwrap();
        assert_eq!(cells(&path), vec![(2, 2), (1, 1), (0, 0)]);
        assert_eq!(path.cost_along(&cost), accum.terminal());
    }

    #[test]
    fn rectangular_path_is_contiguous() {
        let (cost, accum) = matrices(
            vec![1.0, 5.0, 2.0, 8.0, 3.0],
            vec![2.0, 4.0, 7.0],
            Accumulator::unbounded(),
        );
        let path = PathExtractor::new(&cost, &accum).unwrap().extract().unwrap();
        assert_eq!(path.steps().first(), Some(&WarpingStep::new(2, 4)));
        assert_eq!(path.steps().last(), Some(&WarpingStep::new(0, 0)));
        assert!(path.moves().all(|m| m.is_some()));
        assert!(path.len() <= 5 + 3 - 1);
    }

    #[test]
    fn backtrace_is_lazy_and_restartable() {
        let (cost, accum) = matrices(vec![0.0; 4], vec![0.0; 4], Accumulator::unbounded());
        let extractor = PathExtractor::new(&cost, &accum).unwrap();
        let first: Vec<_> = extractor.backtrace().unwrap().take(2).collect();
        assert_eq!(first, vec![WarpingStep::new(3, 3), WarpingStep::new(2, 2)]);
        let full: Vec<_> = extractor.backtrace().unwrap().collect();
        assert_eq!(full.len(), 4);
    }

    #[test]
    fn forward_order_starts_at_origin() {
        let (cost, accum) = matrices(vec![0.0, 1.0], vec![0.0, 1.0], Accumulator::unbounded());
        let path = PathExtractor::new(&cost, &accum).unwrap().extract().unwrap();
        assert_eq!(path.forward().next(), Some(&WarpingStep::new(0, 0)));
        assert_eq!(path.into_forward().last(), Some(&WarpingStep::new(1, 1)));
    }

    #[test]
    fn extract_from_interior_cell() {
        let (cost, accum) = matrices(vec![0.0; 3], vec![0.0; 3], Accumulator::unbounded());
        let path = PathExtractor::new(&cost, &accum).unwrap().extract_from(0, 2).unwrap();
        assert_eq!(cells(&path), vec![(0, 2), (0, 1), (0, 0)]);
    }

    #[test]
    fn infeasible_terminal_is_unreachable() {
        let (cost, accum) = matrices(vec![1.0, 2.0, 3.0], vec![1.0, 3.0], Accumulator::bounded(0));
        let extractor = PathExtractor::new(&cost, &accum).unwrap();
        assert_eq!(extractor.extract(), Err(DtwError::UnreachableCell { row: 1, col: 2 }));
    }

    #[test]
    fn out_of_band_start_is_unreachable() {
        let (cost, accum) = matrices(vec![0.0; 6], vec![0.0; 6], Accumulator::bounded(1));
        let extractor = PathExtractor::new(&cost, &accum).unwrap();
        assert!(matches!(
            extractor.extract_from(5, 0),
            Err(DtwError::UnreachableCell { row: 5, col: 0 })
        ));
        assert!(extractor.extract_from(9, 9).is_err());
    }

    #[test]
    fn overflowed_terminal_is_not_unreachable() {
        let (cost, accum) = matrices(vec![1e308, 1e308], vec![-5e307, -5e307], Accumulator::unbounded());
        let extractor = PathExtractor::new(&cost, &accum).unwrap();
        assert_eq!(extractor.extract(), Err(DtwError::CostOverflow { row: 1, col: 1 }));
        // The first row is still finite.
        assert_eq!(extractor.extract_from(0, 0).unwrap().len(), 1);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let (cost, _) = matrices(vec![0.0; 3], vec![0.0; 2], Accumulator::unbounded());
        let (_, other) = matrices(vec![0.0; 2], vec![0.0; 3], Accumulator::unbounded());
        assert!(matches!(
            PathExtractor::new(&cost, &other),
            Err(DtwError::ShapeMismatch { .. })
        ));
    }
}
