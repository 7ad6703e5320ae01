//! Metric pairs the search can be driven by.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::{self, Candidate};

/// A function mapping a candidate matrix to the two metrics being matched.
///
/// Implemented by [`MetricPair`] and by any `Fn(&Candidate) -> (f64, f64)`
/// closure, so ad-hoc metric combinations can be searched as well.
pub trait MetricFn {
    fn evaluate(&self, candidate: &Candidate) -> (f64, f64);
}

impl<F> MetricFn for F
where
    F: Fn(&Candidate) -> (f64, f64),
{
    fn evaluate(&self, candidate: &Candidate) -> (f64, f64) {
        self(candidate)
    }
}

/// The reported statistic pairs supported out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricPair {
    /// Sensitivity and specificity.
    SensitivitySpecificity,
    /// Positive and negative predictive value.
    PpvNpv,
    /// Positive and negative likelihood ratio.
    LikelihoodRatios,
}

impl MetricPair {
    /// Column labels for the two metrics, used in tables and CSV headers.
    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            Self::SensitivitySpecificity => ("Sensitivity", "Specificity"),
            Self::PpvNpv => ("PPV", "NPV"),
            Self::LikelihoodRatios => ("PLR", "NLR"),
        }
    }
}

impl MetricFn for MetricPair {
    fn evaluate(&self, candidate: &Candidate) -> (f64, f64) {
        match self {
            Self::SensitivitySpecificity => (
                metrics::sensitivity(candidate),
                metrics::specificity(candidate),
            ),
            Self::PpvNpv => (metrics::ppv(candidate), metrics::npv(candidate)),
            Self::LikelihoodRatios => (
                metrics::positive_lr(candidate),
                metrics::negative_lr(candidate),
            ),
        }
    }
}

impl fmt::Display for MetricPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.labels();
        write!(f, "{a}/{b}")
    }
}
