//! Error types for DTW alignment.

/// Errors from sequence validation, accumulation and path extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a sequence.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("sequence contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a band fraction is negative, NaN or infinite.
    #[error("band fraction must be finite and non-negative, got {fraction}")]
    InvalidBandFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when the band leaves the terminal cell unreachable from the origin.
    #[error("no feasible alignment under band of radius {bound} for a {rows}x{cols} matrix")]
    InfeasibleBand {
        /// Band radius in columns.
        bound: usize,
        /// Number of rows (length of sequence B).
        rows: usize,
        /// Number of columns (length of sequence A).
        cols: usize,
    },

    /// Returned when a backtrace starts outside the matrix or at a cell no
    /// in-band path reaches.
    #[error("cell ({row}, {col}) is unreachable")]
    UnreachableCell {
        /// Row index (position in sequence B).
        row: usize,
        /// Column index (position in sequence A).
        col: usize,
    },

    /// Returned when a cell the band reaches has an infinite accumulated cost
    /// because finite costs summed past `f64::MAX`.
    #[error("accumulated cost at ({row}, {col}) overflowed to infinity")]
    CostOverflow {
        /// Row index (position in sequence B).
        row: usize,
        /// Column index (position in sequence A).
        col: usize,
    },

    /// Returned when a cost matrix and an accumulated matrix disagree in shape.
    #[error("matrix shape mismatch: cost is {cost_rows}x{cost_cols}, accumulated is {accum_rows}x{accum_cols}")]
    ShapeMismatch {
        /// Rows of the cost matrix.
        cost_rows: usize,
        /// Columns of the cost matrix.
        cost_cols: usize,
        /// Rows of the accumulated matrix.
        accum_rows: usize,
        /// Columns of the accumulated matrix.
        accum_cols: usize,
    },
}
