//! Band constraint types for DTW accumulation.

use std::fmt;
use std::ops::Range;

use crate::error::DtwError;

/// Default band width as a fraction of the length of sequence A.
pub const DEFAULT_BAND_FRACTION: f64 = 0.05;

/// Band radius as a fraction of the length of sequence A.
///
/// Validated once at construction; [`radius`][Self::radius] then never fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFraction(f64);

impl BandFraction {
    /// Create a band fraction.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidBandFraction`] if `fraction` is negative or
    /// not finite.
    pub fn new(fraction: f64) -> Result<Self, DtwError> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(DtwError::InvalidBandFraction { fraction });
        }
        Ok(Self(fraction))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return `round(na * fraction)`.
    #[must_use]
    pub fn radius(self, na: usize) -> usize {
        (na as f64 * self.0).round() as usize
    }
}

impl Default for BandFraction {
    fn default() -> Self {
        Self(DEFAULT_BAND_FRACTION)
    }
}

/// Constraint on the warping window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandConstraint {
    /// No constraint: the full accumulated matrix is computed.
    #[default]
    Unconstrained,

    /// Sakoe-Chiba corridor around the slope `na / nb`: cell `(i, j)` is valid
    /// only if `|i * na / nb - j| <= bound`.
    SakoeChiba {
        /// Corridor half-width in columns.
        bound: usize,
    },
}

impl BandConstraint {
    /// Build a Sakoe-Chiba band whose radius is `round(na * fraction)`.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidBandFraction`] if `fraction` is negative or
    /// not finite.
    pub fn from_fraction(na: usize, fraction: f64) -> Result<Self, DtwError> {
        Ok(Self::with_fraction(BandFraction::new(fraction)?, na))
    }

    /// Build the Sakoe-Chiba band of an already validated fraction.
    #[must_use]
    pub fn with_fraction(fraction: BandFraction, na: usize) -> Self {
        Self::SakoeChiba {
            bound: fraction.radius(na),
        }
    }

    /// Return the band radius, or `None` when unconstrained.
    #[must_use]
    pub fn bound(&self) -> Option<usize> {
        match self {
            Self::Unconstrained => None,
            Self::SakoeChiba { bound } => Some(*bound),
        }
    }

    /// Return true if a band is active.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::SakoeChiba { .. })
    }

    /// Return the valid column range for `row` of an `n_rows x n_cols` matrix.
    ///
    /// For Sakoe-Chiba, this is every `j` with `|row * n_cols - j * n_rows| <= bound * n_rows`,
    /// clipped to `[0, n_cols)`. The range is empty when the band passes between
    /// two columns without touching either.
    #[must_use]
    pub fn column_range(&self, row: usize, n_rows: usize, n_cols: usize) -> Range<usize> {
        match self {
            Self::Unconstrained => 0..n_cols,
            Self::SakoeChiba { bound } => {
                let num = row * n_cols;
                let floor = num / n_rows;
                let ceil = num.div_ceil(n_rows);
                let start = ceil.saturating_sub(*bound);
                let end = (floor + bound + 1).min(n_cols);
                if start < end { start..end } else { end..end }
            }
        }
    }

    /// Return true if `(row, col)` lies inside the band.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize, n_rows: usize, n_cols: usize) -> bool {
        row < n_rows && self.column_range(row, n_rows, n_cols).contains(&col)
    }

    /// Return the columns of `row` that some in-band path from `(0, 0)` reaches.
    ///
    /// A cell is reached when its diagonal or vertical predecessor is, or when
    /// the cell to its left is. Once the band disconnects, every later row is empty.
    #[must_use]
    pub fn reachable_range(&self, row: usize, n_rows: usize, n_cols: usize) -> Range<usize> {
        let mut reach = self.column_range(0, n_rows, n_cols);
        for i in 1..=row {
            let span = self.column_range(i, n_rows, n_cols);
            let first = span.start.max(reach.start);
            if reach.is_empty() || first > reach.end || first >= span.end {
                return span.end..span.end;
            }
            reach = first..span.end;
        }
        reach
    }

    /// Return true if `(row, col)` lies on some in-band path from the origin.
    ///
    /// With finite costs this is exactly the set of cells whose accumulated
    /// value is finite.
    #[must_use]
    pub fn reaches(&self, row: usize, col: usize, n_rows: usize, n_cols: usize) -> bool {
        row < n_rows && self.reachable_range(row, n_rows, n_cols).contains(&col)
    }

    /// Return the maximum number of columns any row can span.
    ///
    /// For unconstrained DTW, returns `n_cols`. For Sakoe-Chiba with radius `r`,
    /// returns `min(2*r + 1, n_cols)`.
    #[must_use]
    pub fn band_width(&self, n_cols: usize) -> usize {
        match self {
            Self::Unconstrained => n_cols,
            Self::SakoeChiba { bound } => (2 * bound + 1).min(n_cols),
        }
    }
}

impl fmt::Display for BandConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconstrained => f.write_str("unbounded"),
            Self::SakoeChiba { bound } => write!(f, "bounded(r={bound})"),
        }
    }
}
