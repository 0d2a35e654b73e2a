//! Benchmark outcome.

use serde::Serialize;

/// Values at the probe cell in both modes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Probe {
    pub row: usize,
    pub col: usize,
    /// Elementwise cost at the cell.
    pub cost: f64,
    /// Unbounded accumulated cost at the cell.
    pub unbounded: f64,
    /// Bounded accumulated cost, `None` when the cell is unreachable under the band.
    pub bounded: Option<f64>,
}

/// Result of one bounded vs. unbounded comparison.
///
/// Timings cover cost matrix construction plus accumulation for each mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Origin of sequence A (columns).
    pub source_a: String,
    /// Origin of sequence B (rows).
    pub source_b: String,
    pub len_a: usize,
    pub len_b: usize,
    pub metric: String,
    pub band_fraction: f64,
    /// Sakoe-Chiba radius derived from `band_fraction`.
    pub bound: usize,
    pub unbounded_cost: f64,
    /// `None` when the band leaves the terminal cell unreachable.
    pub bounded_cost: Option<f64>,
    pub bounded_feasible: bool,
    pub unbounded_secs: f64,
    pub bounded_secs: f64,
    /// `unbounded_secs / bounded_secs`, `None` if the bounded run was too fast to time.
    pub speedup: Option<f64>,
    /// Accumulated cells evaluated in each mode.
    pub unbounded_cells: usize,
    pub bounded_cells: usize,
    pub probe: Option<Probe>,
    /// Path lengths, present only when paths were requested (and feasible).
    pub unbounded_path_len: Option<usize>,
    pub bounded_path_len: Option<usize>,
}

impl BenchReport {
    /// Extra cost incurred by the band, `None` if the bounded run was infeasible.
    #[must_use]
    pub fn cost_gap(&self) -> Option<f64> {
        self.bounded_cost.map(|c| c - self.unbounded_cost)
    }

    /// True when banding found the unbounded optimum.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.bounded_cost == Some(self.unbounded_cost)
    }

    /// Fraction of the unbounded work the bounded run performed.
    #[must_use]
    pub fn cell_ratio(&self) -> f64 {
        self.bounded_cells as f64 / self.unbounded_cells as f64
    }
}
