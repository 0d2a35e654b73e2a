//! Domain types for warpbench-io.

use crate::IoError;

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A validated experiment name used as the prefix of every output file.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidName`] if the name is empty or contains
    /// characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if !is_valid_name(&name) {
            return Err(IoError::InvalidName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `{experiment}_{suffix}.{extension}`.
    pub(crate) fn file_name(&self, suffix: &str, extension: &str) -> String {
        format!("{}_{suffix}.{extension}", self.0)
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_experiment_names() {
        assert!(ExperimentName::new("test_01".into()).is_ok());
        assert!(ExperimentName::new("dtw-bench".into()).is_ok());
        assert!(ExperimentName::new("ABC".into()).is_ok());
    }

    #[test]
    fn invalid_experiment_names() {
        assert!(ExperimentName::new(String::new()).is_err());
        assert!(ExperimentName::new("has space".into()).is_err());
        assert!(ExperimentName::new("../escape".into()).is_err());
    }

    #[test]
    fn file_name_layout() {
        let name = ExperimentName::new("run1".into()).unwrap();
        assert_eq!(name.file_name("cost", "csv"), "run1_cost.csv");
    }
}
