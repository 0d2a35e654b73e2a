//! Dynamic Time Warping alignment engine.
//!
//! Pure math library, zero I/O. Builds the pairwise cost matrix of two
//! sequences, accumulates it with or without a Sakoe-Chiba band, and
//! backtracks the optimal warping path.
//!
//! ```
//! use warpbench_dtw::{Dtw, Sequence};
//!
//! let a = Sequence::new(vec![0.0, 0.0, 0.0]).unwrap();
//! let b = Sequence::new(vec![0.0, 0.0, 0.0]).unwrap();
//! let alignment = Dtw::unconstrained().align(a.as_view(), b.as_view()).unwrap();
//! assert_eq!(alignment.total_cost().value(), 0.0);
//! assert_eq!(alignment.path().unwrap().len(), 3);
//! ```

mod accumulate;
mod constraint;
mod cost;
mod dtw;
mod error;
mod metric;
mod path;
mod sequence;
mod total;

pub use accumulate::{AccumulatedMatrix, Accumulator, Step};
pub use constraint::{BandConstraint, BandFraction, DEFAULT_BAND_FRACTION};
pub use cost::{CostMatrix, MatrixView};
pub use dtw::{Alignment, Dtw};
pub use error::DtwError;
pub use metric::{CostMetric, Metric, ParseMetricError};
pub use path::{Backtrace, PathExtractor, WarpingPath, WarpingStep};
pub use sequence::{Sequence, SequenceView};
pub use total::TotalCost;
