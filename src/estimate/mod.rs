//! Exhaustive confusion-matrix search ranked by distance to reported metrics.
//!
//! Given two target metric values and a total sample size, every
//! nonnegative split of the sample into (TP, TN, FP, FN) is scored by the L1
//! distance between its implied metrics and the targets. The result set is
//! stably sorted by that distance, so ties keep enumeration order
//! (TP, then TN, then FP, then FN, all ascending).

pub mod metrics;
pub mod pair;
pub mod parallel;
pub mod progress;

use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{debug, instrument};

pub use metrics::{metrics_from_counts, Candidate, DiagnosticMetrics};
pub use pair::{MetricFn, MetricPair};
pub use parallel::search_parallel;
pub use progress::{CancelToken, SearchObserver, Silent};

/// Exact-match tolerance for programmatic callers.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Upper bound on the up-front row allocation.
const MAX_PREALLOCATED_ROWS: u64 = 1 << 20;

/// Targets and constraints for one search.
///
/// No domain validation happens here: rates outside [0, 1] or a negative
/// tolerance are simply scored as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchQuery {
    pub target_a: f64,
    pub target_b: f64,
    pub sample_size: u32,
    pub tolerance: f64,
    /// Required TP + FN. `None` leaves it free, `Some(0)` means nobody is diseased.
    pub disease_count: Option<i64>,
}

impl SearchQuery {
    pub fn new(target_a: f64, target_b: f64, sample_size: u32) -> Self {
        Self {
            target_a,
            target_b,
            sample_size,
            tolerance: DEFAULT_TOLERANCE,
            disease_count: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_disease_count(mut self, disease_count: Option<i64>) -> Self {
        self.disease_count = disease_count;
        self
    }
}

/// A candidate matrix together with how well it reproduces the targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub calculated_a: f64,
    pub calculated_b: f64,
    pub error_a: f64,
    pub error_b: f64,
    pub total_error: f64,
    pub exact_match: bool,
}

/// Ranked output of a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    rows: Vec<ScoredCandidate>,
    complete: bool,
}

impl ResultSet {
    /// Stable-sort scored rows by ascending total error.
    ///
    /// NaN errors, which only arise from non-finite targets, sort last.
    pub(crate) fn ranked(mut rows: Vec<ScoredCandidate>, complete: bool) -> Self {
        rows.sort_by(|a, b| a.total_error.total_cmp(&b.total_error));
        Self { rows, complete }
    }

    pub fn rows(&self) -> &[ScoredCandidate] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ScoredCandidate> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// False when the search was cancelled before visiting every candidate.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.rows.first()
    }

    /// The `k` lowest-error rows (fewer if the set is smaller).
    pub fn top(&self, k: usize) -> &[ScoredCandidate] {
        &self.rows[..k.min(self.rows.len())]
    }

    pub fn exact_matches(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.rows.iter().filter(|row| row.exact_match)
    }

    /// Aggregate error statistics, `None` for an empty set.
    pub fn summary(&self) -> Option<ErrorSummary> {
        let best = self.rows.first()?.total_error;
        let count = self.rows.len();
        let mean = self.rows.iter().map(|row| row.total_error).sum::<f64>() / count as f64;
        let mid = count / 2;
        let median = if count % 2 == 1 {
            self.rows[mid].total_error
        } else {
            (self.rows[mid - 1].total_error + self.rows[mid].total_error) / 2.0
        };
        Some(ErrorSummary {
            candidates: count,
            exact_matches: self.exact_matches().count(),
            best,
            mean,
            median,
        })
    }
}

/// Headline statistics over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub candidates: usize,
    pub exact_matches: usize,
    pub best: f64,
    pub mean: f64,
    pub median: f64,
}

/// Number of candidates a query enumerates.
///
/// C(N + 3, 3) when unconstrained, (D + 1)(N - D + 1) with a disease count
/// D, zero when D lies outside [0, N]. Saturates at `u64::MAX`.
pub fn candidate_count(query: &SearchQuery) -> u64 {
    Space::of(query).total()
}

/// Run a silent, uncancellable search.
pub fn search<F: MetricFn + ?Sized>(query: &SearchQuery, metric: &F) -> ResultSet {
    search_with(query, metric, &mut Silent, None)
}

/// Run a search reporting to `observer` and honouring `cancel` between TP rows.
///
/// A cancelled search returns the rows visited so far, ranked the same way;
/// every one of them still satisfies the sample-size and disease-count
/// constraints.
#[instrument(level = "debug", skip(metric, observer, cancel))]
pub fn search_with<F: MetricFn + ?Sized>(
    query: &SearchQuery,
    metric: &F,
    observer: &mut dyn SearchObserver,
    cancel: Option<&CancelToken>,
) -> ResultSet {
    let space = Space::of(query);
    let total = space.total();
    observer.on_start(total);

    let mut rows = Vec::with_capacity(total.min(MAX_PREALLOCATED_ROWS) as usize);
    let mut complete = true;
    if let Some(tps) = space.tp_rows() {
        for tp in tps {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                complete = false;
                break;
            }
            space.scan_row(tp, |candidate| rows.push(score(candidate, query, metric)));
            observer.on_progress(rows.len() as u64, total);
        }
    }

    let visited = rows.len() as u64;
    observer.on_finish(visited, complete);
    debug!(visited, total, complete, "search finished");
    ResultSet::ranked(rows, complete)
}

pub(crate) fn score<F: MetricFn + ?Sized>(
    candidate: Candidate,
    query: &SearchQuery,
    metric: &F,
) -> ScoredCandidate {
    let (calculated_a, calculated_b) = metric.evaluate(&candidate);
    let error_a = abs_error(query.target_a, calculated_a);
    let error_b = abs_error(query.target_b, calculated_b);
    let total_error = error_a + error_b;
    ScoredCandidate {
        candidate,
        calculated_a,
        calculated_b,
        error_a,
        error_b,
        total_error,
        exact_match: total_error <= query.tolerance,
    }
}

/// |target - calculated|, with equal values (including two infinities) at 0.
fn abs_error(target: f64, calculated: f64) -> f64 {
    if target == calculated {
        0.0
    } else {
        (target - calculated).abs()
    }
}

/// The set of matrices a query ranges over.
///
/// The sample-size constraint fixes FN once TP, TN and FP are chosen. A
/// disease count D further splits the sample into TP + FN = D and
/// TN + FP = N - D, leaving only TP and TN free.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Space {
    Free { n: u32 },
    Split { diseased: u32, healthy: u32 },
    Empty,
}

impl Space {
    pub(crate) fn of(query: &SearchQuery) -> Self {
        let n = query.sample_size;
        match query.disease_count {
            None => Self::Free { n },
            Some(d) if (0..=i64::from(n)).contains(&d) => {
                let diseased = d as u32;
                Self::Split {
                    diseased,
                    healthy: n - diseased,
                }
            }
            Some(_) => Self::Empty,
        }
    }

    pub(crate) fn tp_rows(&self) -> Option<RangeInclusive<u32>> {
        match *self {
            Self::Free { n } => Some(0..=n),
            Self::Split { diseased, .. } => Some(0..=diseased),
            Self::Empty => None,
        }
    }

    /// Candidates sharing one TP value.
    pub(crate) fn row_len(&self, tp: u32) -> u64 {
        match *self {
            Self::Free { n } => {
                let rest = u64::from(n - tp);
                (rest + 1) * (rest + 2) / 2
            }
            Self::Split { healthy, .. } => u64::from(healthy) + 1,
            Self::Empty => 0,
        }
    }

    pub(crate) fn total(&self) -> u64 {
        let n = match *self {
            Self::Free { n } => u128::from(n),
            Self::Split { diseased, healthy } => {
                return (u64::from(diseased) + 1).saturating_mul(u64::from(healthy) + 1)
            }
            Self::Empty => return 0,
        };
        let count = (n + 1) * (n + 2) * (n + 3) / 6;
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Visit every candidate with the given TP in enumeration order.
    pub(crate) fn scan_row(&self, tp: u32, mut visit: impl FnMut(Candidate)) {
        match *self {
            Self::Free { n } => {
                let rest = n - tp;
                for tn in 0..=rest {
                    for fp in 0..=rest - tn {
                        visit(Candidate::new(tp, tn, fp, rest - tn - fp));
                    }
                }
            }
            Self::Split { diseased, healthy } => {
                let fneg = diseased - tp;
                for tn in 0..=healthy {
                    visit(Candidate::new(tp, tn, healthy - tn, fneg));
                }
            }
            Self::Empty => {}
        }
    }
}
