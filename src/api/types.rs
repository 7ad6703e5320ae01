//! Shared DTOs for JSON responses.
//!
//! Infinite likelihood ratios serialise as `null`.

use serde::Serialize;

use crate::{
    estimate::{Candidate, DiagnosticMetrics, ErrorSummary, MetricPair, ScoredCandidate},
    session::{HistoryEntry, Outcome},
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateResponse {
    Estimate {
        pair: MetricPair,
        labels: [&'static str; 2],
        sample_size: u32,
        disease_count: Option<i64>,
        tolerance: f64,
        complete: bool,
        summary: Option<ErrorSummary>,
        top: Vec<ScoredCandidate>,
    },
    Metrics {
        counts: Candidate,
        metrics: DiagnosticMetrics,
    },
}

impl EstimateResponse {
    pub fn from_outcome(outcome: &Outcome, top_k: usize) -> Self {
        match outcome {
            Outcome::Estimate {
                pair,
                query,
                results,
            } => {
                let (a, b) = pair.labels();
                Self::Estimate {
                    pair: *pair,
                    labels: [a, b],
                    sample_size: query.sample_size,
                    disease_count: query.disease_count,
                    tolerance: query.tolerance,
                    complete: results.is_complete(),
                    summary: results.summary(),
                    top: results.top(top_k).to_vec(),
                }
            }
            Outcome::Metrics { counts, metrics } => Self::Metrics {
                counts: *counts,
                metrics: *metrics,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryDto {
    pub total_runs: usize,
    pub entries: Vec<HistoryEntry>,
}
