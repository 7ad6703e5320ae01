//! Bounded record of past runs, owned by whichever shell drives searches.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::estimate::{Candidate, DiagnosticMetrics, MetricPair, ScoredCandidate};

/// What a single run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunRecord {
    /// Best-ranked candidate of a search.
    Estimate {
        pair: MetricPair,
        best: ScoredCandidate,
    },
    /// Metrics computed from known counts.
    Metrics {
        counts: Candidate,
        metrics: DiagnosticMetrics,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// 1-based position in the run log.
    pub run: usize,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: RunRecord,
}

/// Entries kept when no retention is configured.
pub const DEFAULT_RETENTION: usize = 100;

/// Run log keeping the newest `retention` entries.
///
/// Run numbers keep counting after old entries are evicted.
#[derive(Debug, Clone)]
pub struct RunHistory {
    entries: VecDeque<HistoryEntry>,
    retention: usize,
    total_runs: usize,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding at most `retention` entries, never fewer than one.
    pub fn with_retention(retention: usize) -> Self {
        let retention = retention.max(1);
        Self {
            entries: VecDeque::with_capacity(retention.min(DEFAULT_RETENTION)),
            retention,
            total_runs: 0,
        }
    }

    /// Append a record and return its run number.
    pub fn record(&mut self, record: RunRecord) -> usize {
        self.total_runs += 1;
        if self.entries.len() == self.retention {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            run: self.total_runs,
            recorded_at: Utc::now(),
            record,
        });
        self.total_runs
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(limit)
    }

    /// Runs recorded since creation, including evicted ones.
    pub fn total_runs(&self) -> usize {
        self.total_runs
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
