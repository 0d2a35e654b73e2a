use warpbench_dtw::DtwError;
use warpbench_io::IoError;

/// Errors from benchmark configuration and execution.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Wraps a failure to load inputs or write artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Wraps an alignment error, including a rejected band fraction.
    #[error("alignment error: {0}")]
    Dtw(#[from] DtwError),
}
