//! Binary vector exchange and the vector-source capability.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use warpbench_dtw::Sequence;

use crate::IoError;

/// Bytes per stored sample.
const SAMPLE_BYTES: usize = size_of::<f32>();

/// Anything that can produce a sequence for alignment.
pub trait VectorSource {
    /// Produce the sequence.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if the sequence cannot be read or generated.
    fn load(&self) -> Result<Sequence, IoError>;

    /// Short human-readable origin, used in logs and reports.
    fn describe(&self) -> String;
}

impl VectorSource for Sequence {
    fn load(&self) -> Result<Sequence, IoError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory sequence ({} samples)", self.len())
    }
}

/// A flat array of little-endian `f32` samples with no header.
///
/// The sample count is the file size divided by four. Values widen to `f64`
/// on read and narrow to `f32` on write.
#[derive(Debug, Clone)]
pub struct BinaryVectorFile {
    path: PathBuf,
    expected_len: Option<usize>,
}

impl BinaryVectorFile {
    /// Create a handle for the vector file at `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            expected_len: None,
        }
    }

    /// Require the file to hold exactly `len` samples.
    #[must_use]
    pub fn with_expected_len(mut self, len: usize) -> Self {
        self.expected_len = Some(len);
        self
    }

    /// Return the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
    /// | [`IoError::TruncatedVector`] | Size is not a multiple of 4 bytes |
    /// | [`IoError::LengthMismatch`] | Sample count differs from [`with_expected_len`][Self::with_expected_len] |
    /// | [`IoError::InvalidSequence`] | File is empty or holds a non-finite value |
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Sequence, IoError> {
        let bytes = fs::read(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        if bytes.len() % SAMPLE_BYTES != 0 {
            return Err(IoError::TruncatedVector {
                path: self.path.clone(),
                len_bytes: bytes.len(),
                sample_bytes: SAMPLE_BYTES,
            });
        }

        let values: Vec<f64> = bytes
            .chunks_exact(SAMPLE_BYTES)
            .map(|chunk| f64::from(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])))
            .collect();

        if let Some(expected) = self.expected_len
            && expected != values.len()
        {
            return Err(IoError::LengthMismatch {
                path: self.path.clone(),
                expected,
                got: values.len(),
            });
        }

        let sequence = Sequence::new(values).map_err(|e| IoError::InvalidSequence {
            origin: self.path.display().to_string(),
            source: e,
        })?;
        debug!(n = sequence.len(), "vector file read");
        Ok(sequence)
    }

    /// Write `sequence` to the file, replacing any existing content.
    ///
    /// Every sample is checked before the file is touched.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Unrepresentable`] | A sample's magnitude exceeds `f32::MAX` |
    /// | [`IoError::WriteFile`] | The file cannot be created or written |
    #[instrument(skip(self, sequence), fields(path = %self.path.display(), n = sequence.len()))]
    pub fn write(&self, sequence: &Sequence) -> Result<(), IoError> {
        let samples = sequence
            .as_ref()
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let narrowed = value as f32;
                if narrowed.is_finite() {
                    Ok(narrowed)
                } else {
                    Err(IoError::Unrepresentable {
                        path: self.path.clone(),
                        index,
                        value,
                    })
                }
            })
            .collect::<Result<Vec<f32>, _>>()?;

        let to_write_err = |e: std::io::Error| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        };

        let file = fs::File::create(&self.path).map_err(to_write_err)?;
        let mut out = BufWriter::new(file);
        for sample in samples {
            out.write_all(&sample.to_le_bytes()).map_err(to_write_err)?;
        }
        out.flush().map_err(to_write_err)?;

        info!("vector file written");
        Ok(())
    }
}

impl VectorSource for BinaryVectorFile {
    fn load(&self) -> Result<Sequence, IoError> {
        self.read()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn seq(values: &[f64]) -> Sequence {
        Sequence::new(values.to_vec()).unwrap()
    }

    #[test]
    fn write_then_read_preserves_f32_values() {
        let dir = TempDir::new().unwrap();
        let file = BinaryVectorFile::new(&dir.path().join("v.dat"));
        file.write(&seq(&[0.5, -1.25, 3.0])).unwrap();

        let seq = file.read().unwrap();
        assert_eq!(seq.as_ref(), &[0.5, -1.25, 3.0]);
        assert_eq!(fs::metadata(file.path()).unwrap().len(), 12);
    }

    #[test]
    fn values_narrow_to_f32() {
        let dir = TempDir::new().unwrap();
        let file = BinaryVectorFile::new(&dir.path().join("v.dat"));
        file.write(&seq(&[0.1])).unwrap();
        assert_eq!(file.read().unwrap().as_ref(), &[f64::from(0.1f32)]);
    }

    #[test]
    fn values_beyond_f32_range_are_rejected() {
        let dir = TempDir::new().unwrap();
        let file = BinaryVectorFile::new(&dir.path().join("v.dat"));
        let err = file.write(&seq(&[1.0, 1e300, -1e300])).unwrap_err();
        assert!(matches!(err, IoError::Unrepresentable { index: 1, value, .. } if value == 1e300));
        // Nothing is written when validation fails.
        assert!(!file.path().exists());

        file.write(&seq(&[f64::from(f32::MAX), f64::from(f32::MIN)])).unwrap();
        assert_eq!(file.read().unwrap().as_ref(), &[f64::from(f32::MAX), f64::from(f32::MIN)]);
    }

    #[test]
    fn missing_file() {
        let file = BinaryVectorFile::new(Path::new("/nonexistent/v.dat"));
        assert!(matches!(file.read(), Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.dat");
        fs::write(&path, [0u8; 6]).unwrap();
        assert!(matches!(
            BinaryVectorFile::new(&path).read(),
            Err(IoError::TruncatedVector { len_bytes: 6, .. })
        ));
    }

    #[test]
    fn empty_file_is_invalid_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.dat");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            BinaryVectorFile::new(&path).read(),
            Err(IoError::InvalidSequence { .. })
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.dat");
        fs::write(&path, f32::NAN.to_le_bytes()).unwrap();
        assert!(matches!(
            BinaryVectorFile::new(&path).read(),
            Err(IoError::InvalidSequence { .. })
        ));
    }

    #[test]
    fn expected_length_is_enforced() {
        let dir = TempDir::new().unwrap();
        let file = BinaryVectorFile::new(&dir.path().join("v.dat"));
        file.write(&seq(&[1.0, 2.0])).unwrap();
        let checked = file.clone().with_expected_len(3);
        assert!(matches!(
            checked.read(),
            Err(IoError::LengthMismatch { expected: 3, got: 2, .. })
        ));
        assert!(file.with_expected_len(2).read().is_ok());
    }

    #[test]
    fn sequence_is_its_own_source() {
        let seq = Sequence::new(vec![1.0, 2.0]).unwrap();
        assert_eq!(seq.load().unwrap(), seq);
        assert!(seq.describe().contains("2 samples"));
    }
}
