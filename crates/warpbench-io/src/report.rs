//! JSON report writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, is_valid_name};

/// Writes serializable reports to `{experiment}_{suffix}.json`.
///
/// Creates the output directory on construction if it does not exist.
#[derive(Debug)]
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// Suffix used for benchmark reports.
    pub const BENCH: &'static str = "bench";

    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the experiment whose name prefixes every report file.
    pub fn experiment(&self) -> &ExperimentName {
        &self.experiment
    }

    /// Serialize `report` as pretty JSON and return the written path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::InvalidName`] | `suffix` is not `[a-zA-Z0-9_-]+` |
    /// | [`IoError::Serialize`] | `report` fails to serialize |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip(self, report))]
    pub fn write_report<T: Serialize>(&self, suffix: &str, report: &T) -> Result<PathBuf, IoError> {
        if !is_valid_name(suffix) {
            return Err(IoError::InvalidName {
                name: suffix.to_owned(),
            });
        }
        let path = self
            .output_dir
            .join(self.experiment.file_name(suffix, "json"));

        let json = serde_json::to_string_pretty(report).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_named_json() {
        let dir = TempDir::new().unwrap();
        let writer =
            ReportWriter::new(dir.path(), ExperimentName::new("exp".into()).unwrap()).unwrap();

        let mut report = BTreeMap::new();
        report.insert("cost", 4.0);
        let path = writer.write_report(ReportWriter::BENCH, &report).unwrap();

        assert_eq!(path, dir.path().join("exp_bench.json"));
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["cost"], 4.0);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ReportWriter::new(&nested, ExperimentName::new("x".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn rejects_bad_suffix() {
        let dir = TempDir::new().unwrap();
        let writer =
            ReportWriter::new(dir.path(), ExperimentName::new("x".into()).unwrap()).unwrap();
        assert!(matches!(
            writer.write_report("a/b", &1),
            Err(IoError::InvalidName { .. })
        ));
    }
}
