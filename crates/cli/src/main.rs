//! # PR Commenter CLI
//!
//! Posts the results of a tfsec run as review comments on the pull request
//! that triggered a GitHub Actions workflow.
//!
//! Findings already commented on, and findings on lines the pull request does
//! not change, are skipped. The command fails if any comment could not be written.
//!
//! # Commands
//!
//! - `comment` - Post the findings of a results file on a pull request
//! - `config` - Manage the configuration file
//!
//! # Examples
//!
//! ```bash
//! # Inside a workflow, where GITHUB_REPOSITORY, GITHUB_EVENT_PATH and
//! # GITHUB_WORKSPACE are already set
//! INPUT_GITHUB_TOKEN=${{ secrets.GITHUB_TOKEN }} pr-commenter comment --results results.json
//!
//! # Anywhere else
//! pr-commenter comment --repository owner/repo --event-path event.json --token <token>
//! ```

use std::process::{ExitCode, Termination};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command implementations for the CLI.
mod commands;

/// Configuration management for the CLI.
mod config;

/// Error types specific to the CLI.
mod errors;

/// Workflow event payload handling.
mod event;

/// Analysis report parsing.
mod findings;

use commands::{comment::CommentArgs, config_cmd::ConfigCommands};
use errors::CliError;

/// Environment variable holding the log filter
const LOG_FILTER_VARIABLE: &str = "PR_COMMENTER_LOG";

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Command-line interface structure for the PR commenter.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the PR commenter CLI.
#[derive(Subcommand)]
enum Commands {
    /// Post findings as review comments on a pull request
    Comment(CommentArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Installs the global log subscriber.
///
/// The filter comes from `PR_COMMENTER_LOG`, falling back to `debug` when
/// verbose and `info` otherwise.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_FILTER_VARIABLE)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .context("Failed to install the log subscriber")
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Comment(args) => commands::comment::execute(args).await,
        Commands::Config(cmd) => commands::config_cmd::execute(cmd).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        let e = CliError::from(e);
        eprintln!("{}", e);
        return e.report();
    }

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("The commenter failed: {}", e);
            e.report()
        }
    }
}
