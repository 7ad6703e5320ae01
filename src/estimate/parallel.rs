//! Multi-threaded search, one rayon task per TP row.

use tracing::{debug, instrument, warn};

use super::{score, CancelToken, MetricFn, ResultSet, ScoredCandidate, SearchQuery, Space};

/// Search on a pool of up to `workers` threads.
///
/// Rows are collected in TP order before the stable sort, so a complete run
/// is identical to [`super::search`]. `cancel` is checked once per row;
/// rows skipped after cancellation leave the set incomplete but every row
/// returned still satisfies the query's constraints. Without the `parallel`
/// feature, or with `workers <= 1`, rows are scanned on the calling thread.
#[instrument(level = "debug", skip(metric, cancel))]
pub fn search_parallel<F: MetricFn + Sync + ?Sized>(
    query: &SearchQuery,
    metric: &F,
    workers: usize,
    cancel: Option<&CancelToken>,
) -> ResultSet {
    let space = Space::of(query);
    let Some(tps) = space.tp_rows() else {
        return ResultSet::ranked(Vec::new(), true);
    };

    let scan = |tp: u32| -> Option<Vec<ScoredCandidate>> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return None;
        }
        let mut row = Vec::with_capacity(space.row_len(tp).min(1 << 16) as usize);
        space.scan_row(tp, |candidate| row.push(score(candidate, query, metric)));
        Some(row)
    };

    let rows: Vec<Option<Vec<ScoredCandidate>>> = if workers <= 1 {
        tps.map(&scan).collect()
    } else {
        scan_rows(tps, workers, &scan)
    };

    let complete = rows.iter().all(Option::is_some);
    debug!(rows = rows.len(), complete, "parallel search finished");
    ResultSet::ranked(rows.into_iter().flatten().flatten().collect(), complete)
}

#[cfg(feature = "parallel")]
fn scan_rows<S>(
    tps: std::ops::RangeInclusive<u32>,
    workers: usize,
    scan: &S,
) -> Vec<Option<Vec<ScoredCandidate>>>
where
    S: Fn(u32) -> Option<Vec<ScoredCandidate>> + Sync,
{
    use rayon::prelude::*;

    let run = || tps.clone().into_par_iter().map(scan).collect::<Vec<_>>();
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(run),
        Err(err) => {
            warn!(%err, "could not build search pool, using the global pool");
            run()
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn scan_rows<S>(
    tps: std::ops::RangeInclusive<u32>,
    _workers: usize,
    scan: &S,
) -> Vec<Option<Vec<ScoredCandidate>>>
where
    S: Fn(u32) -> Option<Vec<ScoredCandidate>> + Sync,
{
    tps.map(scan).collect()
}
