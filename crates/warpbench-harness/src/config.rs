//! Benchmark configuration builder.

use warpbench_dtw::{BandFraction, CostMetric};
use warpbench_io::{MatrixRenderer, VectorSource};

use crate::bench;
use crate::error::HarnessError;
use crate::report::BenchReport;

/// Configuration for one bounded vs. unbounded comparison.
///
/// Construct via [`BenchConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `metric`  | `CostMetric::Absolute` |
/// | `paths`   | false |
/// | `probe`   | `Some((4, 6))` |
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub(crate) band_fraction: BandFraction,
    pub(crate) metric: CostMetric,
    pub(crate) paths: bool,
    pub(crate) probe: Option<(usize, usize)>,
}

impl BenchConfig {
    /// Create a configuration whose band radius is `round(len_a * band_fraction)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HarnessError::Dtw`] | `band_fraction` is negative or not finite |
    pub fn new(band_fraction: f64) -> Result<Self, HarnessError> {
        Ok(Self {
            band_fraction: BandFraction::new(band_fraction)?,
            ..Self::default()
        })
    }

    /// Set the elementwise cost metric.
    #[must_use]
    pub fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Extract and render warping paths for both modes.
    #[must_use]
    pub fn with_path(mut self, paths: bool) -> Self {
        self.paths = paths;
        self
    }

    /// Report the cost and accumulated values at `(row, col)`.
    ///
    /// Skipped when the cell lies outside the matrices.
    #[must_use]
    pub fn with_probe(mut self, row: usize, col: usize) -> Self {
        self.probe = Some((row, col));
        self
    }

    /// Report no probe cell.
    #[must_use]
    pub fn without_probe(mut self) -> Self {
        self.probe = None;
        self
    }

    /// Return the band radius as a fraction of the length of sequence A.
    #[must_use]
    pub fn band_fraction(&self) -> f64 {
        self.band_fraction.value()
    }

    /// Return the elementwise cost metric.
    #[must_use]
    pub fn metric(&self) -> CostMetric {
        self.metric
    }

    /// Return true if warping paths are extracted and rendered.
    #[must_use]
    pub fn paths(&self) -> bool {
        self.paths
    }

    /// Return the probe cell as `(row, col)`, if any.
    #[must_use]
    pub fn probe(&self) -> Option<(usize, usize)> {
        self.probe
    }

    /// Run the comparison. See [`run`][crate::run].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`run`][crate::run].
    pub fn run<A, B, R>(&self, a: &A, b: &B, renderer: &mut R) -> Result<BenchReport, HarnessError>
    where
        A: VectorSource + ?Sized,
        B: VectorSource + ?Sized,
        R: MatrixRenderer + ?Sized,
    {
        bench::run(a, b, self, renderer)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            band_fraction: BandFraction::default(),
            metric: CostMetric::Absolute,
            paths: false,
            probe: Some((4, 6)),
        }
    }
}

#[cfg(test)]
mod tests {
    use warpbench_dtw::DtwError;

    use super::*;

    #[test]
    fn defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.band_fraction(), 0.05);
        assert_eq!(config.metric(), CostMetric::Absolute);
        assert!(!config.paths());
        assert_eq!(config.probe(), Some((4, 6)));
        assert_eq!(BenchConfig::new(0.05).unwrap(), config);
    }

    #[test]
    fn rejects_bad_fractions() {
        for f in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                BenchConfig::new(f),
                Err(HarnessError::Dtw(DtwError::InvalidBandFraction { .. }))
            ));
        }
        assert!(BenchConfig::new(0.0).is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = BenchConfig::new(0.1)
            .unwrap()
            .with_metric(CostMetric::Squared)
            .with_path(true)
            .with_probe(1, 2);
        assert_eq!(config.metric(), CostMetric::Squared);
        assert!(config.paths());
        assert_eq!(config.probe(), Some((1, 2)));
        assert_eq!(config.without_probe().probe(), None);
    }
}
