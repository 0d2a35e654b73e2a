//! Bounded vs. unbounded DTW comparison for warpbench.
//!
//! [`run`] aligns two sequences twice, once over the full grid and once inside
//! a Sakoe-Chiba band, and reports how cost and runtime differ.

mod bench;
mod config;
mod error;
mod report;

pub use bench::run;
pub use config::BenchConfig;
pub use error::HarnessError;
pub use report::{BenchReport, Probe};
