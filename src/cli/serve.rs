//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{api, config::Settings};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 8080).
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Search worker threads per request, overrides SEARCH_WORKERS.
    #[arg(long)]
    pub workers: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(workers) = args.workers {
        settings.search_workers = workers.max(1);
    }
    info!(
        workers = settings.search_workers,
        max_sample_size = settings.max_sample_size,
        "starting API"
    );
    api::serve(settings, args.host, args.port).await
}
