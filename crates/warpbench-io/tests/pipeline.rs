//! End-to-end: generate -> vector file -> align -> CSV render -> JSON report.

use std::fs;

use serde::Serialize;
use tempfile::TempDir;
use warpbench_dtw::Dtw;
use warpbench_io::{
    BinaryVectorFile, CsvRenderer, ExperimentName, GaussianSource, MatrixRenderer, ReportWriter,
    VectorSource,
};

#[derive(Serialize)]
struct Summary {
    total: f64,
    path_len: usize,
}

#[test]
fn generated_sequence_round_trip() {
    let dir = TempDir::new().unwrap();

    // 1. Generate and persist
    let generated = GaussianSource::new(40, 7).generate().unwrap();
    let file = BinaryVectorFile::new(&dir.path().join("a.dat")).with_expected_len(40);
    file.write(&generated).unwrap();

    // 2. Read back through the source trait; values narrow to f32
    let loaded = file.load().unwrap();
    assert_eq!(loaded.len(), 40);
    for (x, y) in generated.as_ref().iter().zip(loaded.as_ref()) {
        assert!((x - y).abs() < 1e-6);
    }

    // 3. Self-alignment costs nothing and follows the diagonal
    let alignment = Dtw::unconstrained()
        .align(loaded.as_view(), loaded.as_view())
        .unwrap();
    let path = alignment.path().unwrap();
    assert_eq!(alignment.total_cost().value(), 0.0);
    assert_eq!(path.len(), 40);

    // 4. Render
    let out = dir.path().join("out");
    let experiment = ExperimentName::new("rt".into()).unwrap();
    let mut renderer = CsvRenderer::new(&out, experiment.clone()).unwrap();
    renderer
        .render_sequences("sequences", loaded.as_view(), loaded.as_view())
        .unwrap();
    renderer.render_matrix("cost", alignment.cost()).unwrap();
    renderer
        .render_matrix("accumulated", alignment.accumulated())
        .unwrap();
    renderer.render_path("path", &path).unwrap();
    assert_eq!(renderer.written().len(), 4);

    let cost_csv = fs::read_to_string(out.join("rt_cost.csv")).unwrap();
    assert_eq!(cost_csv.lines().count(), 40);
    assert!(cost_csv.lines().all(|l| l.split(',').count() == 40));

    // 5. Report
    let writer = ReportWriter::new(&out, experiment).unwrap();
    let written = writer
        .write_report(
            ReportWriter::BENCH,
            &Summary {
                total: alignment.total_cost().value(),
                path_len: path.len(),
            },
        )
        .unwrap();
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(content["path_len"].as_u64().unwrap(), 40);
    assert_eq!(content["total"].as_f64().unwrap(), 0.0);
}

#[test]
fn band_marks_unreachable_cells_in_csv() {
    let dir = TempDir::new().unwrap();
    let a = GaussianSource::new(30, 1).generate().unwrap();
    let b = GaussianSource::new(30, 2).generate().unwrap();

    let alignment = Dtw::with_sakoe_chiba(2)
        .align(a.as_view(), b.as_view())
        .unwrap();
    let mut renderer =
        CsvRenderer::new(dir.path(), ExperimentName::new("band".into()).unwrap()).unwrap();
    renderer
        .render_matrix("accumulated", alignment.accumulated())
        .unwrap();

    let csv = fs::read_to_string(dir.path().join("band_accumulated.csv")).unwrap();
    let first = csv.lines().next().unwrap();
    // Row 0 keeps columns 0..=2, the rest lie outside the band.
    let cells: Vec<&str> = first.split(',').collect();
    assert_eq!(cells.len(), 30);
    assert!(cells[..3].iter().all(|c| *c != "inf"));
    assert!(cells[3..].iter().all(|c| *c == "inf"));
}
