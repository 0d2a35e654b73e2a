//! Deterministic synthetic sequences.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, instrument};
use warpbench_dtw::Sequence;

use crate::IoError;
use crate::vector::VectorSource;

/// Normally distributed samples drawn from a seeded ChaCha8 stream.
///
/// The same `(len, seed, mean, std_dev)` always yields the same sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianSource {
    len: usize,
    seed: u64,
    mean: f64,
    std_dev: f64,
}

impl GaussianSource {
    /// Standard normal samples (`mean = 0`, `std_dev = 1`).
    pub fn new(len: usize, seed: u64) -> Self {
        Self {
            len,
            seed,
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    /// Shift the distribution mean.
    #[must_use]
    pub fn with_mean(mut self, mean: f64) -> Self {
        self.mean = mean;
        self
    }

    /// Set the standard deviation. Validated by [`generate`][Self::generate].
    #[must_use]
    pub fn with_std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = std_dev;
        self
    }

    /// Return the number of samples to draw.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if no samples will be drawn, which [`generate`][Self::generate] rejects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the sequence.
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidDistribution`] if `std_dev` is negative or not finite.
    /// - [`IoError::InvalidSequence`] if `len == 0` or `mean` is not finite.
    #[instrument(skip(self), fields(len = self.len, seed = self.seed))]
    pub fn generate(&self) -> Result<Sequence, IoError> {
        let normal = Normal::new(self.mean, self.std_dev).map_err(|e| {
            IoError::InvalidDistribution {
                mean: self.mean,
                std_dev: self.std_dev,
                source: e,
            }
        })?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let values: Vec<f64> = normal.sample_iter(&mut rng).take(self.len).collect();

        let sequence = Sequence::new(values).map_err(|e| IoError::InvalidSequence {
            origin: self.describe(),
            source: e,
        })?;
        debug!("sequence generated");
        Ok(sequence)
    }
}

impl VectorSource for GaussianSource {
    fn load(&self) -> Result<Sequence, IoError> {
        self.generate()
    }

    fn describe(&self) -> String {
        format!(
            "gaussian(n={}, seed={}, mean={}, std_dev={})",
            self.len, self.seed, self.mean, self.std_dev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = GaussianSource::new(64, 42).generate().unwrap();
        let b = GaussianSource::new(64, 42).generate().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn different_seeds_differ() {
        let a = GaussianSource::new(32, 1).generate().unwrap();
        let b = GaussianSource::new(32, 2).generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_std_dev_is_constant() {
        let seq = GaussianSource::new(8, 3)
            .with_mean(2.5)
            .with_std_dev(0.0)
            .generate()
            .unwrap();
        assert!(seq.as_ref().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn sample_mean_near_requested() {
        let seq = GaussianSource::new(4000, 9).with_mean(5.0).generate().unwrap();
        let mean = seq.as_ref().iter().sum::<f64>() / seq.len() as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
    }

    #[test]
    fn negative_std_dev_rejected() {
        let err = GaussianSource::new(8, 0).with_std_dev(-1.0).generate();
        assert!(matches!(err, Err(IoError::InvalidDistribution { .. })));
    }

    #[test]
    fn empty_length_rejected() {
        let err = GaussianSource::new(0, 0).generate();
        assert!(matches!(err, Err(IoError::InvalidSequence { .. })));
    }
}
