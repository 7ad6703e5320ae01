//! Command-line interface wiring for confusion-estimator.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::{config::Settings, logging};

pub mod estimate;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Back-solve plausible confusion matrices from reported diagnostic accuracy",
    long_about = None
)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default tracing directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        logging::directive_for(self.verbose)
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Estimate(args) => estimate::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank confusion matrices matching a metric pair, or convert known counts.
    Estimate(estimate::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
}
