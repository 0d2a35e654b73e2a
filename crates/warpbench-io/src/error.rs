//! I/O error types for warpbench-io.

use std::path::PathBuf;

use warpbench_dtw::DtwError;

/// Errors from vector files, sequence generation, rendering and report output.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a vector file's size is not a whole number of samples.
    #[error("truncated vector file {path}: {len_bytes} bytes is not a multiple of {sample_bytes}")]
    TruncatedVector {
        /// Path to the vector file.
        path: PathBuf,
        /// File size in bytes.
        len_bytes: usize,
        /// Size of one stored sample.
        sample_bytes: usize,
    },

    /// Returned when a vector file holds a different number of samples than requested.
    #[error("vector file {path} holds {got} samples, expected {expected}")]
    LengthMismatch {
        /// Path to the vector file.
        path: PathBuf,
        /// Requested sample count.
        expected: usize,
        /// Sample count found in the file.
        got: usize,
    },

    /// Returned when loaded or generated values do not form a valid sequence.
    #[error("invalid sequence from {origin}")]
    InvalidSequence {
        /// Where the values came from (file path or generator description).
        origin: String,
        /// Underlying validation error.
        source: DtwError,
    },

    /// Returned when a sample cannot be stored as a finite `f32`.
    #[error("sample {index} of {path} ({value}) is outside the f32 range")]
    Unrepresentable {
        /// Destination vector file.
        path: PathBuf,
        /// Position of the first offending sample.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when the normal distribution parameters are rejected.
    #[error("invalid normal distribution (mean {mean}, std_dev {std_dev})")]
    InvalidDistribution {
        /// Requested mean.
        mean: f64,
        /// Requested standard deviation.
        std_dev: f64,
        /// Underlying distribution error.
        source: rand_distr::NormalError,
    },

    /// Returned when an experiment or artifact name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV writer fails.
    #[error("CSV write error in {path}")]
    CsvWrite {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a report cannot be serialized to JSON.
    #[error("cannot serialize report for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },
}
