use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use warpbench_dtw::{CostMetric, DEFAULT_BAND_FRACTION, Dtw};
use warpbench_harness::BenchConfig;
use warpbench_io::{
    BinaryVectorFile, CsvRenderer, ExperimentName, GaussianSource, MatrixRenderer, NullRenderer,
    ReportWriter, VectorSource,
};

#[derive(Parser)]
#[command(name = "warpbench")]
#[command(about = "Banded vs. unbanded dynamic time warping benchmark")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for generated sequences
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a normally distributed sequence as a little-endian f32 vector file
    Generate {
        /// Destination vector file
        #[arg(long)]
        output: PathBuf,

        /// Number of samples
        #[arg(long, default_value_t = 1701)]
        len: usize,

        /// Mean of the normal distribution
        #[arg(long, default_value_t = 0.0)]
        mean: f64,

        /// Standard deviation of the normal distribution
        #[arg(long, default_value_t = 1.0)]
        std_dev: f64,
    },

    /// Compare unbounded and Sakoe-Chiba bounded alignment
    Bench {
        /// Vector file for sequence A (a generated sequence if omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Vector file for sequence B (defaults to sequence A)
        #[arg(long)]
        input_b: Option<PathBuf>,

        /// Length of the generated sequence when no input is given
        #[arg(long, default_value_t = 1701)]
        len: usize,

        /// Band radius as a fraction of the length of sequence A
        #[arg(long, default_value_t = DEFAULT_BAND_FRACTION)]
        band_fraction: f64,

        /// Elementwise cost: "absolute" or "squared"
        #[arg(long, default_value = "absolute")]
        metric: CostMetric,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long, default_value = "bench")]
        experiment: String,

        /// Output directory for CSV artifacts and the JSON report
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Extract and render warping paths
        #[arg(long, default_value_t = false)]
        paths: bool,

        /// Skip CSV rendering (timing and report only)
        #[arg(long, default_value_t = false)]
        no_render: bool,

        /// Probe cell as ROW,COL
        #[arg(long, value_delimiter = ',', default_values_t = [4, 6])]
        probe: Vec<usize>,
    },

    /// Align two vector files and print the total cost
    Align {
        /// Vector file for sequence A (columns)
        #[arg(long)]
        a: PathBuf,

        /// Vector file for sequence B (rows)
        #[arg(long)]
        b: PathBuf,

        /// Sakoe-Chiba radius in samples
        #[arg(long, conflicts_with = "band_fraction")]
        bound: Option<usize>,

        /// Sakoe-Chiba radius as a fraction of the length of A
        #[arg(long)]
        band_fraction: Option<f64>,

        /// Elementwise cost: "absolute" or "squared"
        #[arg(long, default_value = "absolute")]
        metric: CostMetric,

        /// Also extract the warping path and report its length
        #[arg(long, default_value_t = false)]
        path: bool,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct GenerateOutput {
    path: String,
    len: usize,
    seed: u64,
}

#[derive(Serialize)]
struct BenchOutput {
    experiment: String,
    len_a: usize,
    len_b: usize,
    bound: usize,
    unbounded_cost: f64,
    bounded_cost: Option<f64>,
    bounded_feasible: bool,
    unbounded_secs: f64,
    bounded_secs: f64,
    speedup: Option<f64>,
    report: String,
}

#[derive(Serialize)]
struct AlignOutput {
    len_a: usize,
    len_b: usize,
    constraint: String,
    metric: String,
    total_cost: f64,
    exact: bool,
    path_len: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Generate {
            output,
            len,
            mean,
            std_dev,
        } => {
            let sequence = GaussianSource::new(len, cli.seed)
                .with_mean(mean)
                .with_std_dev(std_dev)
                .generate()
                .context("failed to generate sequence")?;
            BinaryVectorFile::new(&output)
                .write(&sequence)
                .context("failed to write vector file")?;

            let out = GenerateOutput {
                path: output.display().to_string(),
                len,
                seed: cli.seed,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Command::Bench {
            input,
            input_b,
            len,
            band_fraction,
            metric,
            experiment,
            output_dir,
            paths,
            no_render,
            probe,
        } => {
            let experiment = ExperimentName::new(experiment).context("invalid experiment name")?;

            let source_a: Box<dyn VectorSource> = match &input {
                Some(path) => Box::new(BinaryVectorFile::new(path)),
                None => Box::new(GaussianSource::new(len, cli.seed)),
            };
            // Without a second input the sequence is compared against itself.
            let source_b: Box<dyn VectorSource> = match input_b.as_ref().or(input.as_ref()) {
                Some(path) => Box::new(BinaryVectorFile::new(path)),
                None => Box::new(GaussianSource::new(len, cli.seed)),
            };

            let [row, col] = probe[..] else {
                anyhow::bail!("--probe expects ROW,COL, got {probe:?}");
            };
            let config = BenchConfig::new(band_fraction)?
                .with_metric(metric)
                .with_path(paths)
                .with_probe(row, col);

            let mut renderer: Box<dyn MatrixRenderer> = if no_render {
                Box::new(NullRenderer)
            } else {
                Box::new(
                    CsvRenderer::new(&output_dir, experiment.clone())
                        .context("failed to prepare output directory")?,
                )
            };

            let report = config
                .run(&*source_a, &*source_b, &mut *renderer)
                .context("benchmark failed")?;
            let report_path = ReportWriter::new(&output_dir, experiment.clone())?
                .write_report(ReportWriter::BENCH, &report)
                .context("failed to write benchmark report")?;

            let out = BenchOutput {
                experiment: experiment.as_str().to_owned(),
                len_a: report.len_a,
                len_b: report.len_b,
                bound: report.bound,
                unbounded_cost: report.unbounded_cost,
                bounded_cost: report.bounded_cost,
                bounded_feasible: report.bounded_feasible,
                unbounded_secs: report.unbounded_secs,
                bounded_secs: report.bounded_secs,
                speedup: report.speedup,
                report: report_path.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Command::Align {
            a,
            b,
            bound,
            band_fraction,
            metric,
            path,
        } => {
            let seq_a = BinaryVectorFile::new(&a)
                .read()
                .with_context(|| format!("failed to read {}", a.display()))?;
            let seq_b = BinaryVectorFile::new(&b)
                .read()
                .with_context(|| format!("failed to read {}", b.display()))?;

            let dtw = match (bound, band_fraction) {
                (Some(bound), _) => Dtw::with_sakoe_chiba(bound),
                (None, Some(fraction)) => Dtw::with_band_fraction(seq_a.len(), fraction)?,
                (None, None) => Dtw::unconstrained(),
            }
            .with_metric(metric);
            info!(constraint = %dtw.constraint(), metric = %dtw.metric(), "aligning");

            let (total_cost, path_len) = if path {
                let alignment = dtw
                    .align(seq_a.as_view(), seq_b.as_view())
                    .context("alignment failed")?;
                let warping = alignment.path().context("path extraction failed")?;
                (alignment.total_cost(), Some(warping.len()))
            } else {
                let total = dtw
                    .distance(seq_a.as_view(), seq_b.as_view())
                    .context("alignment failed")?;
                (total, None)
            };
            info!(total = %total_cost, "alignment complete");

            let out = AlignOutput {
                len_a: seq_a.len(),
                len_b: seq_b.len(),
                constraint: dtw.constraint().to_string(),
                metric: metric.to_string(),
                total_cost: total_cost.value(),
                exact: total_cost.is_exact(),
                path_len,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
