//! Bounded vs. unbounded comparison driver.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use warpbench_dtw::{
    AccumulatedMatrix, BandConstraint, CostMatrix, Dtw, DtwError, PathExtractor, Sequence,
};
use warpbench_io::{MatrixRenderer, VectorSource};

use crate::config::BenchConfig;
use crate::error::HarnessError;
use crate::report::{BenchReport, Probe};

/// Matrices and timing of one mode.
struct ModeRun {
    cost: CostMatrix,
    accumulated: AccumulatedMatrix,
    secs: f64,
}

fn timed(dtw: Dtw, a: &Sequence, b: &Sequence) -> ModeRun {
    let start = Instant::now();
    let (cost, accumulated) = dtw.matrices(a.as_view(), b.as_view());
    ModeRun {
        cost,
        accumulated,
        secs: start.elapsed().as_secs_f64(),
    }
}

/// Load both sequences, align them without and then with the band, render
/// every artifact and summarise the outcome.
///
/// Sequence A spans the columns and sets the band radius
/// (`round(len_a * band_fraction)`). A band too narrow to reach the terminal
/// cell is reported through `bounded_feasible`, not as an error. An overflowing
/// cost is an error in either mode.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HarnessError::Io`] | a source fails to load or an artifact fails to render |
/// | [`HarnessError::Dtw`] | a reachable cost overflows or a path cannot be extracted |
#[instrument(skip_all, fields(a = %a.describe(), b = %b.describe(), fraction = config.band_fraction()))]
pub fn run<A, B, R>(
    a: &A,
    b: &B,
    config: &BenchConfig,
    renderer: &mut R,
) -> Result<BenchReport, HarnessError>
where
    A: VectorSource + ?Sized,
    B: VectorSource + ?Sized,
    R: MatrixRenderer + ?Sized,
{
    let seq_a = a.load()?;
    let seq_b = b.load()?;
    let (na, nb) = (seq_a.len(), seq_b.len());
    info!(na, nb, "sequences loaded");

    let band = BandConstraint::with_fraction(config.band_fraction, na);
    let bound = band.bound().unwrap_or(na);

    let unbounded = timed(
        Dtw::unconstrained().with_metric(config.metric),
        &seq_a,
        &seq_b,
    );
    let unbounded_cost = unbounded.accumulated.total_cost()?.value();
    info!(cost = unbounded_cost, secs = unbounded.secs, "unbounded alignment");

    let bounded = timed(Dtw::new(band).with_metric(config.metric), &seq_a, &seq_b);
    let bounded_cost = match bounded.accumulated.total_cost() {
        Ok(total) => Some(total.value()),
        Err(DtwError::InfeasibleBand { .. }) => {
            warn!(bound, "band leaves the terminal cell unreachable");
            None
        }
        Err(e) => return Err(e.into()),
    };
    info!(cost = ?bounded_cost, secs = bounded.secs, bound, "bounded alignment");

    renderer.render_sequences("sequences", seq_a.as_view(), seq_b.as_view())?;
    renderer.render_matrix("cost_unbounded", &unbounded.cost)?;
    renderer.render_matrix("accumulated_unbounded", &unbounded.accumulated)?;
    renderer.render_matrix("cost_bounded", &bounded.cost)?;
    renderer.render_matrix("accumulated_bounded", &bounded.accumulated)?;

    let mut unbounded_path_len = None;
    let mut bounded_path_len = None;
    if config.paths {
        let path = PathExtractor::new(&unbounded.cost, &unbounded.accumulated)?.extract()?;
        renderer.render_path("path_unbounded", &path)?;
        unbounded_path_len = Some(path.len());

        if bounded_cost.is_some() {
            let path = PathExtractor::new(&bounded.cost, &bounded.accumulated)?.extract()?;
            renderer.render_path("path_bounded", &path)?;
            bounded_path_len = Some(path.len());
        }
    }

    let probe = config.probe.and_then(|(row, col)| {
        if row >= nb || col >= na {
            debug!(row, col, "probe outside the matrices, skipped");
            return None;
        }
        let banded = bounded.accumulated.get(row, col);
        Some(Probe {
            row,
            col,
            cost: unbounded.cost.get(row, col),
            unbounded: unbounded.accumulated.get(row, col),
            bounded: banded.is_finite().then_some(banded),
        })
    });

    let speedup = (bounded.secs > 0.0).then(|| unbounded.secs / bounded.secs);

    let report = BenchReport {
        source_a: a.describe(),
        source_b: b.describe(),
        len_a: na,
        len_b: nb,
        metric: config.metric.to_string(),
        band_fraction: config.band_fraction(),
        bound,
        unbounded_cost,
        bounded_feasible: bounded_cost.is_some(),
        bounded_cost,
        unbounded_secs: unbounded.secs,
        bounded_secs: bounded.secs,
        speedup,
        unbounded_cells: unbounded.accumulated.evaluated_cells(),
        bounded_cells: bounded.accumulated.evaluated_cells(),
        probe,
        unbounded_path_len,
        bounded_path_len,
    };
    info!(speedup = ?report.speedup, exact = report.is_exact(), "benchmark complete");
    Ok(report)
}
