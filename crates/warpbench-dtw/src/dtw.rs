//! DTW alignment facade over the cost, accumulation and backtracking stages.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::accumulate::{AccumulatedMatrix, Accumulator, select, span_value};
use crate::constraint::BandConstraint;
use crate::cost::CostMatrix;
use crate::error::DtwError;
use crate::metric::{CostMetric, Metric};
use crate::path::{Backtrace, PathExtractor, WarpingPath};
use crate::sequence::{Sequence, SequenceView};
use crate::total::TotalCost;

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    constraint: BandConstraint,
    metric: CostMetric,
}

impl Dtw {
    /// Create an unconstrained DTW calculator with the absolute-difference metric.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::new(BandConstraint::Unconstrained)
    }

    /// Create a DTW calculator with a Sakoe-Chiba band of radius `bound`.
    #[must_use]
    pub fn with_sakoe_chiba(bound: usize) -> Self {
        Self::new(BandConstraint::SakoeChiba { bound })
    }

    /// Create a banded DTW calculator whose radius is `round(na * fraction)`,
    /// `na` being the length of sequence A.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidBandFraction`] if `fraction` is negative or not finite.
    pub fn with_band_fraction(na: usize, fraction: f64) -> Result<Self, DtwError> {
        Ok(Self::new(BandConstraint::from_fraction(na, fraction)?))
    }

    /// Create a DTW calculator from an existing [`BandConstraint`].
    #[must_use]
    pub fn new(constraint: BandConstraint) -> Self {
        Self {
            constraint,
            metric: CostMetric::default(),
        }
    }

    /// Use `metric` for elementwise costs.
    #[must_use]
    pub fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Return the band constraint configuration.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Return the elementwise metric.
    #[must_use]
    pub fn metric(&self) -> CostMetric {
        self.metric
    }

    /// Build the cost and accumulated matrices without checking feasibility.
    ///
    /// Useful for rendering a band that turned out too narrow.
    #[must_use]
    #[instrument(skip(a, b), fields(na = a.len(), nb = b.len()))]
    pub fn matrices(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> (CostMatrix, AccumulatedMatrix) {
        let cost = CostMatrix::build(a, b, &self.metric);
        let accumulated = Accumulator::new(self.constraint).accumulate(&cost);
        (cost, accumulated)
    }

    /// Align `a` (columns) against `b` (rows).
    ///
    /// Allocates the cost matrix and the row-limited accumulated matrix. Use
    /// [`distance`][Dtw::distance] when only the total cost is needed.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InfeasibleBand`] | the band leaves the terminal cell unreachable |
    /// | [`DtwError::CostOverflow`] | the terminal is reachable but its cost exceeds `f64::MAX` |
    pub fn align(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<Alignment, DtwError> {
        let (cost, accumulated) = self.matrices(a, b);
        let total = accumulated.total_cost()?;
        debug!(total = total.value(), "alignment complete");
        Ok(Alignment {
            cost,
            accumulated,
            total,
        })
    }

    /// Compute only the total alignment cost.
    ///
    /// Uses a rolling two-row buffer rather than the full matrices: O(nb * bw)
    /// time and O(bw) space. Returns exactly the value [`align`][Dtw::align]
    /// would report.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InfeasibleBand`] | the band leaves the terminal unreachable |
    /// | [`DtwError::CostOverflow`] | the terminal is reachable but its cost exceeds `f64::MAX` |
    #[instrument(skip(a, b), fields(na = a.len(), nb = b.len()))]
    pub fn distance(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<TotalCost, DtwError> {
        let terminal = self.rolling_terminal(a.as_slice(), b.as_slice());
        TotalCost::from_terminal(terminal, self.constraint, b.len(), a.len())
    }

    /// Align independent `(a, b)` pairs in parallel.
    ///
    /// Each pair is a separate, sequential recurrence; results keep the input order.
    #[instrument(skip(self, pairs), fields(n = pairs.len()))]
    pub fn align_batch(&self, pairs: &[(Sequence, Sequence)]) -> Vec<Result<Alignment, DtwError>> {
        pairs
            .par_iter()
            .map(|(a, b)| self.align(a.as_view(), b.as_view()))
            .collect()
    }

    /// Rolling two-row recurrence returning the raw terminal value.
    ///
    /// `prev` holds row `i-1` over `prev_span`; `curr` is filled over the span
    /// of row `i`. Reads outside either span are infinite.
    fn rolling_terminal(&self, a: &[f64], b: &[f64]) -> f64 {
        let cols = a.len();
        let rows = b.len();
        let bw = self.constraint.band_width(cols);

        let mut prev = vec![f64::INFINITY; bw];
        let mut curr = vec![f64::INFINITY; bw];
        let mut prev_span = 0..0;

        for (i, &bi) in b.iter().enumerate() {
            let span = self.constraint.column_range(i, rows, cols);
            curr.fill(f64::INFINITY);

            for j in span.clone() {
                let local = j - span.start;
                let c = self.metric.cost(bi, a[j]);

                if i == 0 && j == 0 {
                    curr[local] = c;
                    continue;
                }

                let diag = if j > 0 { span_value(&prev, &prev_span, j - 1) } else { f64::INFINITY };
                let above = span_value(&prev, &prev_span, j);
                let left = if local > 0 { curr[local - 1] } else { f64::INFINITY };

                curr[local] = c + select([diag, above, left]).0;
            }

            prev_span = span;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last row.
        span_value(&prev, &prev_span, cols - 1)
    }
}

/// Cost matrix, accumulated matrix and total cost of a feasible alignment.
#[derive(Debug, Clone)]
pub struct Alignment {
    cost: CostMatrix,
    accumulated: AccumulatedMatrix,
    total: TotalCost,
}

impl Alignment {
    /// Return the elementwise cost matrix.
    #[must_use]
    pub fn cost(&self) -> &CostMatrix {
        &self.cost
    }

    /// Return the accumulated-cost matrix.
    #[must_use]
    pub fn accumulated(&self) -> &AccumulatedMatrix {
        &self.accumulated
    }

    /// Return the total alignment cost.
    #[must_use]
    pub fn total_cost(&self) -> TotalCost {
        self.total
    }

    /// Lazily backtrack the optimal path, terminal first.
    ///
    /// # Errors
    ///
    /// Propagates [`PathExtractor`] errors; a feasible alignment never produces one.
    pub fn backtrace(&self) -> Result<Backtrace<'_>, DtwError> {
        PathExtractor::new(&self.cost, &self.accumulated)?.backtrace()
    }

    /// Collect the optimal path, terminal first.
    ///
    /// # Errors
    ///
    /// Propagates [`PathExtractor`] errors; a feasible alignment never produces one.
    pub fn path(&self) -> Result<WarpingPath, DtwError> {
        PathExtractor::new(&self.cost, &self.accumulated)?.extract()
    }
}
