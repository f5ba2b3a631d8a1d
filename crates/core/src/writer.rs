use std::time::Duration;

use pr_commenter_developer_platforms::{
    models::{CommentAnchor, NewReviewComment},
    PullRequestProvider,
};
use tracing::{info, instrument, warn};

use crate::{
    diff::{DiffIndex, NotInDiff},
    errors::CommenterError,
    existing::{ExistingCommentSet, PostedComment},
    finding::Finding,
    fingerprint::Fingerprint,
    outcome::{RejectReason, WriteOutcome},
    PullRequestId,
};

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;

/// Places findings on a pull request as review comments, at most once each.
///
/// Each write consults the existing comments first, then the diff, and only
/// then calls the platform. Writes take `&mut self` so the duplicate check and
/// the recording of a new comment can never interleave with another write.
#[derive(Debug)]
pub struct CommentWriter<P: PullRequestProvider> {
    provider: P,
    pull_request: PullRequestId,
    head_sha: String,
    diff: DiffIndex,
    existing: ExistingCommentSet,
    request_timeout: Duration,
}

impl<P: PullRequestProvider> CommentWriter<P> {
    /// Creates a writer for a pull request.
    ///
    /// # Arguments
    ///
    /// * `provider` - The platform the pull request lives on
    /// * `pull_request` - The pull request to comment on
    /// * `head_sha` - The head commit every comment is anchored on
    /// * `diff` - The diff of the pull request
    /// * `existing` - The review comments already on the pull request
    /// * `request_timeout` - The maximum time a single comment creation may take
    pub fn new(
        provider: P,
        pull_request: PullRequestId,
        head_sha: String,
        diff: DiffIndex,
        existing: ExistingCommentSet,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            pull_request,
            head_sha,
            diff,
            existing,
            request_timeout,
        }
    }

    pub fn head_sha(&self) -> &str {
        &self.head_sha
    }

    pub fn diff(&self) -> &DiffIndex {
        &self.diff
    }

    pub fn existing(&self) -> &ExistingCommentSet {
        &self.existing
    }

    /// Writes one finding as a review comment.
    ///
    /// # Returns
    ///
    /// * `Duplicate` if an equivalent comment is already on the pull request
    /// * `Rejected` if the lines are not part of the diff, or the platform says so
    /// * `Posted` once the comment has been created and recorded
    /// * `Failed` for any other failure, including a request that timed out
    #[instrument(
        skip(self, finding),
        fields(
            path = finding.path.as_str(),
            start_line = finding.start_line,
            end_line = finding.end_line
        )
    )]
    pub async fn write(&mut self, finding: &Finding) -> WriteOutcome {
        let fingerprint = Fingerprint::of(&finding.body);

        if self.existing.contains(
            &finding.path,
            finding.start_line,
            finding.end_line,
            &fingerprint,
        ) {
            info!("Comment already written so not writing");
            return WriteOutcome::Duplicate;
        }

        let position =
            match self
                .diff
                .resolve_range(&finding.path, finding.start_line, finding.end_line)
            {
                Ok(position) => position,
                Err(NotInDiff::Unparseable) => {
                    warn!(
                        error = self
                            .diff
                            .parse_error(&finding.path)
                            .map(|e| e.to_string())
                            .unwrap_or_default(),
                        "Comment not written, the patch of the file could not be parsed"
                    );
                    return WriteOutcome::Rejected(RejectReason::NotInDiff(
                        NotInDiff::Unparseable,
                    ));
                }
                Err(reason) => {
                    info!(
                        reason = reason.to_string(),
                        "Comment not written, not part of the current pull request"
                    );
                    return WriteOutcome::Rejected(RejectReason::NotInDiff(reason));
                }
            };

        let anchor = if finding.is_multi_line() {
            CommentAnchor::Lines {
                start_line: finding.start_line,
                line: finding.end_line,
            }
        } else {
            CommentAnchor::Position(position)
        };
        let comment = NewReviewComment {
            path: finding.path.clone(),
            body: finding.body.clone(),
            commit_id: self.head_sha.clone(),
            anchor,
        };

        let request = self.provider.create_review_comment(
            &self.pull_request.owner,
            &self.pull_request.repo,
            self.pull_request.number,
            &comment,
        );
        let created = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(created)) => created,
            Ok(Err(e)) if e.is_not_part_of_diff() => {
                info!(
                    error = e.to_string(),
                    "The platform refused the comment as not part of the diff"
                );
                return WriteOutcome::Rejected(RejectReason::RemoteRejected(e.to_string()));
            }
            Ok(Err(e)) => {
                warn!(error = e.to_string(), "Failed to write comment");
                return WriteOutcome::Failed(e.into());
            }
            Err(_) => {
                warn!(
                    timeout = ?self.request_timeout,
                    "Timed out while writing comment"
                );
                return WriteOutcome::Failed(CommenterError::Timeout {
                    operation: "create a review comment",
                    after: self.request_timeout,
                });
            }
        };

        let posted = PostedComment {
            path: finding.path.clone(),
            start_line: finding.start_line,
            end_line: finding.end_line,
            fingerprint,
            position: Some(position),
            id: Some(created.id),
            commit_id: Some(self.head_sha.clone()),
        };
        self.existing.record(posted.clone());

        info!(
            position = position,
            comment = created.id,
            "Wrote comment"
        );
        WriteOutcome::Posted(posted)
    }
}
