use std::path::PathBuf;

use clap::Args;
use pr_commenter_core::{BatchSummary, PullRequestId, Session, SessionOptions, WriteOutcome};
use tracing::{error, info, instrument, warn};

use crate::{
    config::{split_repository, AppConfig, DEFAULT_RESULTS_PATH},
    errors::CliError,
    event::{read_pull_request_number, DEFAULT_EVENT_PATH},
    findings::load_findings,
};

#[cfg(test)]
#[path = "comment_tests.rs"]
mod tests;

/// Arguments for the comment command
#[derive(Args, Debug)]
pub struct CommentArgs {
    /// GitHub access token. Falls back to GITHUB_TOKEN.
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in the form owner/repo
    #[arg(short, long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Path of the workflow event payload
    #[arg(long, env = "GITHUB_EVENT_PATH", default_value = DEFAULT_EVENT_PATH)]
    pub event_path: PathBuf,

    /// Path of the tfsec JSON report
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Checkout directory that prefixes the file names in the report
    #[arg(short, long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<String>,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,
}

fn resolve_token(token: Option<String>) -> Result<String, CliError> {
    token
        .filter(|t| !t.is_empty())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
        .ok_or_else(|| {
            CliError::AuthError(
                "No GitHub token given. Set INPUT_GITHUB_TOKEN or GITHUB_TOKEN, or pass --token."
                    .to_string(),
            )
        })
}

/// Logs what happened to every finding and fails if any finding could not be written.
pub fn report(summary: &BatchSummary) -> Result<(), CliError> {
    for entry in summary.reports() {
        let finding = &entry.finding;
        match &entry.outcome {
            WriteOutcome::Posted(_) => info!(
                path = finding.path.as_str(),
                start_line = finding.start_line,
                end_line = finding.end_line,
                "Wrote comment"
            ),
            WriteOutcome::Duplicate => info!(
                path = finding.path.as_str(),
                start_line = finding.start_line,
                end_line = finding.end_line,
                "Comment already written so not writing"
            ),
            WriteOutcome::Rejected(reason) => info!(
                path = finding.path.as_str(),
                start_line = finding.start_line,
                end_line = finding.end_line,
                reason = ?reason,
                "Comment not written, not part of the current pull request"
            ),
            WriteOutcome::Failed(_) => {}
        }
    }

    let failures: Vec<_> = summary.failures().collect();
    if failures.is_empty() {
        return Ok(());
    }

    warn!("There were {} errors", failures.len());
    for (finding, e) in &failures {
        error!(
            path = finding.path.as_str(),
            start_line = finding.start_line,
            end_line = finding.end_line,
            error = e.to_string(),
            "Failed to write comment"
        );
    }

    Err(CliError::CommentsFailed(failures.len()))
}

/// Execute the comment command
#[instrument(skip(args))]
pub async fn execute(args: CommentArgs) -> Result<(), CliError> {
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let token = resolve_token(args.token)?;

    let repository = args.repository.ok_or_else(|| {
        CliError::InvalidArguments(
            "No repository given. Set GITHUB_REPOSITORY or pass --repository.".to_string(),
        )
    })?;
    let (owner, repo) = split_repository(&repository)?;
    let number = read_pull_request_number(&args.event_path)?;

    let results_path = args
        .results
        .or(config.results_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_PATH));
    let workspace = args.workspace.or(config.workspace.clone());
    let findings = load_findings(&results_path, workspace.as_deref())?;

    let pull_request = PullRequestId::new(owner, repo, number);
    info!(
        pull_request = %pull_request,
        findings = findings.len(),
        "Starting the GitHub commenter"
    );

    let options = SessionOptions {
        request_timeout: config.request_timeout()?,
    };
    let mut session = Session::connect(&token, pull_request, options).await?;
    let summary = session.write_all(findings).await;

    report(&summary)
}
