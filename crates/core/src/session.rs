use std::{future::Future, time::Duration};

use pr_commenter_developer_platforms::{
    errors::Error,
    github::{create_token_client, GitHubProvider},
    PullRequestProvider,
};
use tracing::{info, instrument};

use crate::{
    diff::DiffIndex,
    errors::CommenterError,
    existing::ExistingCommentSet,
    finding::Finding,
    outcome::{BatchSummary, OutcomeKind, WriteOutcome},
    writer::CommentWriter,
    PullRequestId,
};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Default upper bound for a single request to the platform.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// The maximum time each read at session start and each comment creation may take
    pub request_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

async fn bounded<T>(
    operation: &'static str,
    after: Duration,
    request: impl Future<Output = Result<T, Error>>,
) -> Result<T, CommenterError> {
    match tokio::time::timeout(after, request).await {
        Ok(result) => result.map_err(CommenterError::from),
        Err(_) => Err(CommenterError::Timeout { operation, after }),
    }
}

/// Commenting state for one pull request over one run.
///
/// Opening a session reads the pull request's head commit, its diff and its
/// existing review comments once. Those are then used for every finding written
/// through the session, so all comments of a run are anchored on the same commit
/// even if the branch moves while the run is in progress.
///
/// # Examples
///
/// ```rust,no_run
/// use pr_commenter_core::{Finding, PullRequestId, Session, SessionOptions, WriteOutcome};
///
/// # async fn example() -> Result<(), pr_commenter_core::errors::CommenterError> {
/// let pull_request = PullRequestId::new("owner", "repo", 42);
/// let mut session = Session::connect("ghp_example", pull_request, SessionOptions::default()).await?;
///
/// let finding = Finding::new("main.tf", 12, 13, "## result\nbucket is public");
/// match session.write(&finding).await {
///     WriteOutcome::Posted(_) => println!("posted"),
///     WriteOutcome::Duplicate => println!("already there"),
///     WriteOutcome::Rejected(_) => println!("not part of the diff"),
///     WriteOutcome::Failed(e) => eprintln!("failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<P: PullRequestProvider> {
    pull_request: PullRequestId,
    writer: CommentWriter<P>,
}

impl Session<GitHubProvider> {
    /// Authenticates with GitHub using an access token and opens a session.
    pub async fn connect(
        token: &str,
        pull_request: PullRequestId,
        options: SessionOptions,
    ) -> Result<Self, CommenterError> {
        let client = create_token_client(token, options.request_timeout)?;
        Self::open(GitHubProvider::new(client), pull_request, options).await
    }
}

impl<P: PullRequestProvider> Session<P> {
    /// Opens a session by reading the pull request, its diff and its existing
    /// review comments.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the reads fails or takes longer than the
    /// request timeout. Without them no finding can be placed safely.
    #[instrument(skip(provider, pull_request, options), fields(pull_request = %pull_request))]
    pub async fn open(
        provider: P,
        pull_request: PullRequestId,
        options: SessionOptions,
    ) -> Result<Self, CommenterError> {
        let PullRequestId {
            owner,
            repo,
            number,
        } = &pull_request;
        let after = options.request_timeout;

        let pr = bounded(
            "read the pull request",
            after,
            provider.get_pull_request(owner, repo, *number),
        )
        .await?;

        let files = bounded(
            "read the pull request diff",
            after,
            provider.get_pull_request_files(owner, repo, *number),
        )
        .await?;
        let diff = DiffIndex::build(&files);

        let existing = bounded(
            "list the existing review comments",
            after,
            ExistingCommentSet::load(&provider, owner, repo, *number, &diff),
        )
        .await?;

        info!(
            repository_owner = owner.as_str(),
            repository = repo.as_str(),
            pull_request = number,
            head_sha = pr.head_sha.as_str(),
            files = files.len(),
            existing_comments = existing.len(),
            "Opened commenting session"
        );

        let writer = CommentWriter::new(
            provider,
            pull_request.clone(),
            pr.head_sha,
            diff,
            existing,
            options.request_timeout,
        );

        Ok(Self {
            pull_request,
            writer,
        })
    }

    pub fn pull_request(&self) -> &PullRequestId {
        &self.pull_request
    }

    /// The head commit captured when the session was opened.
    pub fn head_sha(&self) -> &str {
        self.writer.head_sha()
    }

    pub fn writer(&self) -> &CommentWriter<P> {
        &self.writer
    }

    /// Writes one finding. See [`CommentWriter::write`].
    pub async fn write(&mut self, finding: &Finding) -> WriteOutcome {
        self.writer.write(finding).await
    }

    /// Writes every finding in order and collects the outcomes.
    ///
    /// A failing finding never stops the batch; its error is kept in the summary.
    pub async fn write_all<I>(&mut self, findings: I) -> BatchSummary
    where
        I: IntoIterator<Item = Finding>,
    {
        let mut summary = BatchSummary::default();
        for finding in findings {
            let outcome = self.writer.write(&finding).await;
            summary.push(finding, outcome);
        }

        info!(
            pull_request = %self.pull_request,
            total = summary.len(),
            posted = summary.count(OutcomeKind::Posted),
            duplicate = summary.count(OutcomeKind::Duplicate),
            rejected = summary.count(OutcomeKind::Rejected),
            failed = summary.count(OutcomeKind::Failed),
            "Processed findings"
        );

        summary
    }
}
