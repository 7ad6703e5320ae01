//! Runtime configuration utilities for confusion-estimator.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::session::DEFAULT_RETENTION;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Exact-match threshold used when a request does not carry one.
    pub default_tolerance: f64,
    /// Number of ranked rows shown or returned per search.
    pub top_k: usize,
    /// Number of history entries shown.
    pub history_limit: usize,
    /// Number of history entries the server keeps in memory.
    pub history_retention: usize,
    /// Largest sample size the shell will enumerate.
    pub max_sample_size: u32,
    /// Worker threads for the search, 1 keeps it on the calling thread.
    pub search_workers: usize,
    /// Root folder for exported result tables.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_tolerance: 0.001,
            top_k: 10,
            history_limit: 5,
            history_retention: DEFAULT_RETENTION,
            max_sample_size: 200,
            search_workers: 1,
            outputs_dir: PathBuf::from("./outputs"),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let default_tolerance = env_or("DEFAULT_TOLERANCE", defaults.default_tolerance);
        anyhow::ensure!(
            default_tolerance.is_finite() && default_tolerance >= 0.0,
            "DEFAULT_TOLERANCE must be a nonnegative number"
        );

        Ok(Self {
            default_tolerance,
            top_k: env_or("TOP_K", defaults.top_k),
            history_limit: env_or("HISTORY_LIMIT", defaults.history_limit),
            history_retention: env_or("HISTORY_RETENTION", defaults.history_retention).max(1),
            max_sample_size: env_or("MAX_SAMPLE_SIZE", defaults.max_sample_size),
            search_workers: env_or("SEARCH_WORKERS", defaults.search_workers).max(1),
            outputs_dir: env::var("OUTPUTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.outputs_dir),
        })
    }

    /// Resolve an export path; relative paths land under the outputs folder.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
