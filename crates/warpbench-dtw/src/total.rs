//! Total alignment cost.

use std::fmt;

use crate::constraint::BandConstraint;
use crate::error::DtwError;

/// Finite accumulated cost at the terminal cell, tagged with the band it was
/// accumulated under.
///
/// An unbounded total is the DTW distance. A bounded total is an upper bound on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalCost {
    value: f64,
    constraint: BandConstraint,
}

impl TotalCost {
    pub(crate) fn new(value: f64, constraint: BandConstraint) -> Self {
        debug_assert!(value.is_finite(), "total cost must be finite");
        Self { value, constraint }
    }

    /// Classify the terminal value of an `rows x cols` recurrence.
    ///
    /// An infinite terminal is [`DtwError::InfeasibleBand`] when the band never
    /// reaches it and [`DtwError::CostOverflow`] when it does.
    pub(crate) fn from_terminal(
        terminal: f64,
        constraint: BandConstraint,
        rows: usize,
        cols: usize,
    ) -> Result<Self, DtwError> {
        if terminal.is_finite() {
            return Ok(Self::new(terminal, constraint));
        }
        let (row, col) = (rows - 1, cols - 1);
        if constraint.reaches(row, col, rows, cols) {
            Err(DtwError::CostOverflow { row, col })
        } else {
            Err(DtwError::InfeasibleBand {
                bound: constraint.bound().unwrap_or(cols),
                rows,
                cols,
            })
        }
    }

    /// Return the raw cost.
    #[must_use]
    pub fn value(self) -> f64 {
        self.value
    }

    /// Return the constraint the cost was accumulated under.
    #[must_use]
    pub fn constraint(self) -> BandConstraint {
        self.constraint
    }

    /// True when no band restricted the search, so the cost is the exact DTW distance.
    #[must_use]
    pub fn is_exact(self) -> bool {
        !self.constraint.is_bounded()
    }
}

impl fmt::Display for TotalCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ({})", self.value, self.constraint)
    }
}
