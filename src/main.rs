//! Entry point wiring CLI dispatch to the estimator.

use anyhow::Result;
use confusion_estimator::{cli::Cli, config::Settings, logging};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_directive())?;
    let settings = Settings::load()?;

    debug!(?cli, ?settings, "starting command");
    cli.dispatch(settings).await
}
