//! Rendering of sequences, matrices and warping paths.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use warpbench_dtw::{MatrixView, SequenceView, WarpingPath};

use crate::IoError;
use crate::domain::{ExperimentName, is_valid_name};

/// Sink for the artifacts of an alignment run.
///
/// `title` names the artifact within a run (e.g. `cost_unbounded`) and must
/// match `[a-zA-Z0-9_-]+`.
pub trait MatrixRenderer {
    /// Render both input sequences.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if the artifact cannot be produced.
    fn render_sequences(
        &mut self,
        title: &str,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
    ) -> Result<(), IoError>;

    /// Render a full matrix. Unreachable cells are infinite.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if the artifact cannot be produced.
    fn render_matrix(&mut self, title: &str, matrix: &dyn MatrixView) -> Result<(), IoError>;

    /// Render a warping path in origin-to-terminal order.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if the artifact cannot be produced.
    fn render_path(&mut self, title: &str, path: &WarpingPath) -> Result<(), IoError>;
}

/// Renderer that discards everything. Used for timing-only runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MatrixRenderer for NullRenderer {
    fn render_sequences(
        &mut self,
        _title: &str,
        _a: SequenceView<'_>,
        _b: SequenceView<'_>,
    ) -> Result<(), IoError> {
        Ok(())
    }

    fn render_matrix(&mut self, _title: &str, _matrix: &dyn MatrixView) -> Result<(), IoError> {
        Ok(())
    }

    fn render_path(&mut self, _title: &str, _path: &WarpingPath) -> Result<(), IoError> {
        Ok(())
    }
}

/// Writes each artifact to `{experiment}_{title}.csv` in an output directory.
///
/// - sequences: header `sequence,index,value`, one row per sample of `a` then `b`
/// - matrices: no header, one CSV row per matrix row, infinite cells as `inf`
/// - paths: header `step,row,col`, origin first
#[derive(Debug)]
pub struct CsvRenderer {
    output_dir: PathBuf,
    experiment: ExperimentName,
    written: Vec<PathBuf>,
}

impl CsvRenderer {
    /// Create a renderer targeting `output_dir`, creating it if needed.
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
            written: Vec::new(),
        })
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn artifact_path(&self, title: &str) -> Result<PathBuf, IoError> {
        if !is_valid_name(title) {
            return Err(IoError::InvalidName {
                name: title.to_owned(),
            });
        }
        Ok(self.output_dir.join(self.experiment.file_name(title, "csv")))
    }

    fn write_records<I, R>(&mut self, path: PathBuf, records: I) -> Result<(), IoError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_err)?;
        for record in records {
            wtr.write_record(record).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        debug!(path = %path.display(), "csv written");
        self.written.push(path);
        Ok(())
    }
}

fn format_cell(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_owned()
    } else {
        value.to_string()
    }
}

impl MatrixRenderer for CsvRenderer {
    #[instrument(skip(self, a, b), fields(na = a.len(), nb = b.len()))]
    fn render_sequences(
        &mut self,
        title: &str,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
    ) -> Result<(), IoError> {
        let path = self.artifact_path(title)?;
        let header = vec!["sequence".to_owned(), "index".to_owned(), "value".to_owned()];
        let samples = [("a", a), ("b", b)].into_iter().flat_map(|(label, seq)| {
            seq.as_slice()
                .iter()
                .enumerate()
                .map(move |(i, &v)| vec![label.to_owned(), i.to_string(), v.to_string()])
        });
        self.write_records(path, std::iter::once(header).chain(samples))
    }

    #[instrument(skip(self, matrix), fields(rows = matrix.n_rows(), cols = matrix.n_cols()))]
    fn render_matrix(&mut self, title: &str, matrix: &dyn MatrixView) -> Result<(), IoError> {
        let path = self.artifact_path(title)?;
        let rows = (0..matrix.n_rows()).map(|i| {
            (0..matrix.n_cols())
                .map(|j| format_cell(matrix.value(i, j)))
                .collect::<Vec<_>>()
        });
        self.write_records(path, rows)
    }

    #[instrument(skip(self, path), fields(len = path.len()))]
    fn render_path(&mut self, title: &str, path: &WarpingPath) -> Result<(), IoError> {
        let file = self.artifact_path(title)?;
        let header = vec!["step".to_owned(), "row".to_owned(), "col".to_owned()];
        let steps = path
            .forward()
            .enumerate()
            .map(|(k, s)| vec![k.to_string(), s.row.to_string(), s.col.to_string()]);
        self.write_records(file, std::iter::once(header).chain(steps))
    }
}
