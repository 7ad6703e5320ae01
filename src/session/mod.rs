//! Calling shell shared by the CLI and the HTTP API.

pub mod form;
pub mod history;

use tracing::{info, instrument};

pub use form::{InputForm, Request};
pub use history::{HistoryEntry, RunHistory, RunRecord, DEFAULT_RETENTION};

use crate::{
    config::Settings,
    estimate::{
        candidate_count, metrics_from_counts, search_parallel, search_with, CancelToken,
        Candidate, DiagnosticMetrics, MetricPair, ResultSet, SearchObserver, SearchQuery,
    },
};

/// Result of executing one [`Request`].
#[derive(Debug, Clone)]
pub enum Outcome {
    Estimate {
        pair: MetricPair,
        query: SearchQuery,
        results: ResultSet,
    },
    Metrics {
        counts: Candidate,
        metrics: DiagnosticMetrics,
    },
}

impl Outcome {
    /// The history entry for this run; empty result sets record nothing.
    pub fn history_record(&self) -> Option<RunRecord> {
        match self {
            Self::Estimate { pair, results, .. } => results.best().map(|best| RunRecord::Estimate {
                pair: *pair,
                best: *best,
            }),
            Self::Metrics { counts, metrics } => Some(RunRecord::Metrics {
                counts: *counts,
                metrics: *metrics,
            }),
        }
    }
}

/// Execute a request.
///
/// With more than one configured worker the search runs in parallel; that
/// path observes `cancel` but does not report progress.
#[instrument(level = "debug", skip(settings, observer, cancel))]
pub fn run(
    request: Request,
    settings: &Settings,
    observer: &mut dyn SearchObserver,
    cancel: Option<&CancelToken>,
) -> Outcome {
    match request {
        Request::Counts(counts) => Outcome::Metrics {
            counts,
            metrics: metrics_from_counts(&counts),
        },
        Request::Estimate { pair, query } => {
            info!(
                %pair,
                n = query.sample_size,
                diseased = ?query.disease_count,
                candidates = candidate_count(&query),
                "estimating confusion matrix"
            );
            let results = if settings.search_workers > 1 {
                search_parallel(&query, &pair, settings.search_workers, cancel)
            } else {
                search_with(&query, &pair, observer, cancel)
            };
            Outcome::Estimate {
                pair,
                query,
                results,
            }
        }
    }
}
