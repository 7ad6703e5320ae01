//! Point formulas turning confusion-matrix counts into diagnostic metrics.
//!
//! Every ratio resolves a zero denominator to a fixed value instead of NaN:
//! rates fall back to `0.0`, likelihood ratios to `+inf`. The search engine
//! scores candidates through these same helpers, so forward and inverse
//! calculations cannot drift apart.

use indexmap::IndexMap;
use serde::Serialize;

/// One hypothesised 2x2 confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    #[serde(rename = "TP")]
    pub true_pos: u32,
    #[serde(rename = "TN")]
    pub true_neg: u32,
    #[serde(rename = "FP")]
    pub false_pos: u32,
    #[serde(rename = "FN")]
    pub false_neg: u32,
}

impl Candidate {
    pub fn new(true_pos: u32, true_neg: u32, false_pos: u32, false_neg: u32) -> Self {
        Self {
            true_pos,
            true_neg,
            false_pos,
            false_neg,
        }
    }

    /// Total number of subjects, TP + TN + FP + FN.
    pub fn total(&self) -> u64 {
        u64::from(self.true_pos)
            + u64::from(self.true_neg)
            + u64::from(self.false_pos)
            + u64::from(self.false_neg)
    }

    /// Subjects with the condition, TP + FN.
    pub fn diseased(&self) -> u64 {
        u64::from(self.true_pos) + u64::from(self.false_neg)
    }
}

/// The full set of point metrics for one confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticMetrics {
    pub sensitivity: f64,
    pub specificity: f64,
    pub ppv: f64,
    pub npv: f64,
    pub positive_lr: f64,
    pub negative_lr: f64,
}

impl DiagnosticMetrics {
    /// Label/value pairs in display order.
    pub fn ordered(&self) -> IndexMap<&'static str, f64> {
        let mut map = IndexMap::with_capacity(6);
        map.insert("Sensitivity", self.sensitivity);
        map.insert("Specificity", self.specificity);
        map.insert("PPV", self.ppv);
        map.insert("NPV", self.npv);
        map.insert("+LR", self.positive_lr);
        map.insert("-LR", self.negative_lr);
        map
    }
}

/// Compute every diagnostic metric for the given counts.
pub fn metrics_from_counts(candidate: &Candidate) -> DiagnosticMetrics {
    let sens = sensitivity(candidate);
    let spec = specificity(candidate);
    DiagnosticMetrics {
        sensitivity: sens,
        specificity: spec,
        ppv: ppv(candidate),
        npv: npv(candidate),
        positive_lr: likelihood_ratio(sens, 1.0 - spec),
        negative_lr: likelihood_ratio(1.0 - sens, spec),
    }
}

/// TP / (TP + FN), or 0.0 when nobody is diseased.
pub fn sensitivity(c: &Candidate) -> f64 {
    rate(c.true_pos, c.false_neg)
}

/// TN / (TN + FP), or 0.0 when nobody is healthy.
pub fn specificity(c: &Candidate) -> f64 {
    rate(c.true_neg, c.false_pos)
}

/// TP / (TP + FP), or 0.0 when nobody tested positive.
pub fn ppv(c: &Candidate) -> f64 {
    rate(c.true_pos, c.false_pos)
}

/// TN / (TN + FN), or 0.0 when nobody tested negative.
pub fn npv(c: &Candidate) -> f64 {
    rate(c.true_neg, c.false_neg)
}

/// Sensitivity / (1 - specificity), or +inf when specificity is exactly 1.
pub fn positive_lr(c: &Candidate) -> f64 {
    likelihood_ratio(sensitivity(c), 1.0 - specificity(c))
}

/// (1 - sensitivity) / specificity, or +inf when specificity is exactly 0.
pub fn negative_lr(c: &Candidate) -> f64 {
    likelihood_ratio(1.0 - sensitivity(c), specificity(c))
}

fn rate(hits: u32, misses: u32) -> f64 {
    let denominator = u64::from(hits) + u64::from(misses);
    if denominator == 0 {
        0.0
    } else {
        f64::from(hits) / denominator as f64
    }
}

fn likelihood_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::INFINITY
    } else {
        numerator / denominator
    }
}
