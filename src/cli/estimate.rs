//! CLI entry-point for estimating confusion matrices.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    api::types::EstimateResponse,
    config::Settings,
    estimate::{CancelToken, SearchObserver},
    report::{self, MetricsTable, ResultsTable, SummaryView},
    session::{self, InputForm, Outcome},
};

/// Args for the `estimate` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub form: InputForm,
    /// Rows to print, defaults to TOP_K.
    #[arg(long)]
    pub top: Option<usize>,
    /// Write every ranked candidate to this CSV file; relative paths land in OUTPUTS_DIR.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let request = args.form.resolve(&settings)?;
    let top_k = args.top.unwrap_or(settings.top_k);

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping search");
            on_interrupt.cancel();
        }
    });

    let search_settings = settings.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut progress = LogProgress::default();
        session::run(request, &search_settings, &mut progress, Some(&cancel))
    })
    .await
    .context("search task failed")?;

    if let (Some(path), Outcome::Estimate { pair, results, .. }) = (&args.csv, &outcome) {
        report::export_csv(&settings.join_output(path), *pair, results)?;
    } else if args.csv.is_some() {
        warn!("--csv only applies to metric-pair estimates");
    }

    if args.json {
        let response = EstimateResponse::from_outcome(&outcome, top_k);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match &outcome {
        Outcome::Estimate { pair, results, .. } => {
            print!("{}", ResultsTable { pair: *pair, results, top_k });
            print!("{}", SummaryView(results));
        }
        Outcome::Metrics { counts, metrics } => {
            print!("{}", MetricsTable { counts, metrics });
        }
    }
    Ok(())
}

/// Logs search progress in ten percent steps.
#[derive(Debug, Default)]
struct LogProgress {
    next_decile: u64,
}

impl SearchObserver for LogProgress {
    fn on_start(&mut self, total: u64) {
        info!(total, "testing combinations");
    }

    fn on_progress(&mut self, visited: u64, total: u64) {
        if total == 0 {
            return;
        }
        let decile = visited.saturating_mul(10) / total;
        if decile >= self.next_decile {
            info!(visited, total, percent = decile * 10, "search progress");
            self.next_decile = decile + 1;
        }
    }

    fn on_finish(&mut self, visited: u64, complete: bool) {
        if !complete {
            warn!(visited, "search cancelled, results are partial");
        }
    }
}
