//! # Existing Comments
//!
//! The set of review comments already on a pull request, used to suppress
//! duplicate comments across repeated runs and within a single run.

use std::collections::HashSet;

use pr_commenter_developer_platforms::{
    errors::Error, models::ReviewComment, PullRequestProvider,
};
use tracing::{debug, info, instrument};

use crate::{diff::DiffIndex, fingerprint::Fingerprint};

#[cfg(test)]
#[path = "existing_tests.rs"]
mod tests;

/// The identity of a comment for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentKey {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub fingerprint: Fingerprint,
}

/// A comment that is known to be on the pull request, either because it was
/// there when the session started or because this run posted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub fingerprint: Fingerprint,

    /// The diff position the comment is anchored at, if the platform still maps
    /// it onto the current diff
    pub position: Option<u32>,

    /// The platform's identifier of the comment
    pub id: Option<u64>,

    /// The commit the comment was anchored on
    pub commit_id: Option<String>,
}

impl PostedComment {
    pub fn key(&self) -> CommentKey {
        CommentKey {
            path: self.path.clone(),
            start_line: self.start_line,
            end_line: self.end_line,
            fingerprint: self.fingerprint.clone(),
        }
    }
}

/// Works out the line range a remote comment covers.
///
/// Prefers the lines the platform currently maps the comment to, then the lines
/// it was originally made on, and finally the line behind its diff position.
fn derive_lines(comment: &ReviewComment, diff: &DiffIndex) -> Option<(u32, u32)> {
    let (end_line, start_line) = match (comment.line, comment.original_line) {
        (Some(line), _) => (line, comment.start_line),
        (None, Some(line)) => (line, comment.original_start_line),
        (None, None) => {
            let line = diff.line_at_position(&comment.path, comment.position?)?;
            (line, None)
        }
    };

    Some((start_line.unwrap_or(end_line), end_line))
}

/// Review comments on a pull request, keyed by file, line range and body fingerprint.
///
/// Built once at session start and only appended to afterwards. The set trusts
/// its own records for the rest of the run and never re-fetches.
#[derive(Debug, Clone, Default)]
pub struct ExistingCommentSet {
    keys: HashSet<CommentKey>,
}

impl ExistingCommentSet {
    /// Indexes remote review comments.
    ///
    /// Comments whose line range cannot be worked out are skipped.
    pub fn from_comments(comments: &[ReviewComment], diff: &DiffIndex) -> Self {
        let mut set = ExistingCommentSet::default();

        for comment in comments {
            let Some((start_line, end_line)) = derive_lines(comment, diff) else {
                debug!(
                    path = comment.path.as_str(),
                    comment = comment.id,
                    "Could not determine the lines of an existing review comment. Ignoring it."
                );
                continue;
            };

            set.record(PostedComment {
                path: comment.path.clone(),
                start_line,
                end_line,
                fingerprint: Fingerprint::of(&comment.body),
                position: comment.position,
                id: Some(comment.id),
                commit_id: comment.commit_id.clone(),
            });
        }

        set
    }

    /// Fetches every review comment on a pull request and indexes it.
    ///
    /// # Arguments
    ///
    /// * `provider` - The platform the pull request lives on
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `diff` - The diff of the pull request, used to map diff positions back to lines
    #[instrument(skip(provider, diff))]
    pub async fn load<P: PullRequestProvider + ?Sized>(
        provider: &P,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        diff: &DiffIndex,
    ) -> Result<Self, Error> {
        let comments = provider
            .list_review_comments(repo_owner, repo_name, pr_number)
            .await?;

        let set = Self::from_comments(&comments, diff);
        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            fetched = comments.len(),
            indexed = set.len(),
            "Loaded existing review comments"
        );

        Ok(set)
    }

    /// Checks whether an equivalent comment is already on the pull request.
    pub fn contains(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
        fingerprint: &Fingerprint,
    ) -> bool {
        self.keys.contains(&CommentKey {
            path: path.to_string(),
            start_line,
            end_line,
            fingerprint: fingerprint.clone(),
        })
    }

    /// Records a comment, typically one that was just posted.
    pub fn record(&mut self, comment: PostedComment) {
        self.keys.insert(comment.key());
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
