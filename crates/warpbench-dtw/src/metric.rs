//! Elementwise cost metrics.

use std::fmt;
use std::str::FromStr;

/// A symmetric, non-negative distance between two samples.
///
/// Implemented for [`CostMetric`] and for any `Fn(f64, f64) -> f64 + Sync`
/// closure, so callers can substitute their own distance.
pub trait Metric: Sync {
    /// Return the cost of aligning sample `x` with sample `y`.
    fn cost(&self, x: f64, y: f64) -> f64;
}

/// Built-in elementwise metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CostMetric {
    /// `|x - y|`
    #[default]
    Absolute,
    /// `(x - y)^2`
    Squared,
}

impl Metric for CostMetric {
    #[inline]
    fn cost(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Absolute => (x - y).abs(),
            Self::Squared => (x - y).powi(2),
        }
    }
}

impl<F> Metric for F
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    #[inline]
    fn cost(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Squared => f.write_str("squared"),
        }
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric: {0} (expected absolute or squared)")]
pub struct ParseMetricError(String);

impl FromStr for CostMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" | "abs" => Ok(Self::Absolute),
            "squared" | "sq" => Ok(Self::Squared),
            other => Err(ParseMetricError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_is_symmetric() {
        let m = CostMetric::Absolute;
        assert_eq!(m.cost(1.0, 4.0), 3.0);
        assert_eq!(m.cost(4.0, 1.0), 3.0);
    }

    #[test]
    fn squared_difference() {
        assert_eq!(CostMetric::Squared.cost(1.0, 4.0), 9.0);
    }

    #[test]
    fn closure_metric() {
        let hinge = |x: f64, y: f64| ((x - y).abs() - 1.0).max(0.0);
        assert_eq!(hinge.cost(0.0, 0.5), 0.0);
        assert_eq!(hinge.cost(0.0, 3.0), 2.0);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("abs".parse::<CostMetric>().unwrap(), CostMetric::Absolute);
        assert_eq!("squared".parse::<CostMetric>().unwrap(), CostMetric::Squared);
        assert!("cosine".parse::<CostMetric>().is_err());
        assert_eq!(CostMetric::Squared.to_string(), "squared");
    }

    #[test]
    fn default_is_absolute() {
        assert_eq!(CostMetric::default(), CostMetric::Absolute);
    }
}
