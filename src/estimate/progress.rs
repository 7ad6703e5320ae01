//! Progress reporting and cooperative cancellation for long searches.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Receives advisory progress callbacks while a search enumerates.
///
/// Callbacks fire once per TP row, never per candidate. Nothing an observer
/// does can change the result set.
pub trait SearchObserver {
    /// Called once with the number of candidates the search will visit.
    fn on_start(&mut self, _total: u64) {}

    /// Called after each completed TP row.
    fn on_progress(&mut self, _visited: u64, _total: u64) {}

    /// Called once when enumeration stops, `complete` is false on cancellation.
    fn on_finish(&mut self, _visited: u64, _complete: bool) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SearchObserver for Silent {}

/// Shared flag requesting a search to stop at the next row boundary.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
