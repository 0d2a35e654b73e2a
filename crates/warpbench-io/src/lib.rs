//! Vector files, synthetic sequences, and artifact output for warpbench.

mod domain;
mod error;
mod generate;
mod render;
mod report;
mod vector;

pub use domain::ExperimentName;
pub use error::IoError;
pub use generate::GaussianSource;
pub use render::{CsvRenderer, MatrixRenderer, NullRenderer};
pub use report::ReportWriter;
pub use vector::{BinaryVectorFile, VectorSource};
