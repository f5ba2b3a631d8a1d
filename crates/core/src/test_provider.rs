//! In-memory platform shared by the engine tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use pr_commenter_developer_platforms::{
    errors::Error,
    models::{CommentAnchor, NewReviewComment, PullRequest, PullRequestFile, ReviewComment},
    PullRequestProvider,
};

use crate::diff::parse_patch;

#[derive(Debug, Default)]
struct FakeState {
    head_sha: String,
    files: Vec<PullRequestFile>,
    comments: Vec<ReviewComment>,
    create_calls: usize,
    failing_calls: HashSet<usize>,
    remotely_rejected_paths: HashSet<String>,
    create_delay: Option<Duration>,
    fail_listing: bool,
}

/// A fake platform. Clones share their state, so a second session opened on a
/// clone sees the comments written through the first one.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvider {
    pub(crate) fn new(head_sha: &str) -> Self {
        let provider = Self::default();
        provider.state.lock().unwrap().head_sha = head_sha.to_string();
        provider
    }

    pub(crate) fn with_file(self, filename: &str, patch: &str) -> Self {
        self.state.lock().unwrap().files.push(PullRequestFile {
            filename: filename.to_string(),
            status: "modified".to_string(),
            additions: 0,
            deletions: 0,
            changes: 0,
            patch: Some(patch.to_string()),
        });
        self
    }

    pub(crate) fn with_comment(self, comment: ReviewComment) -> Self {
        self.state.lock().unwrap().comments.push(comment);
        self
    }

    /// Makes the n-th (1-based) comment creation fail with a server error.
    pub(crate) fn failing_create_call(self, call: usize) -> Self {
        self.state.lock().unwrap().failing_calls.insert(call);
        self
    }

    /// Makes the platform refuse comments on a file as not part of the diff.
    pub(crate) fn rejecting_path(self, path: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .remotely_rejected_paths
            .insert(path.to_string());
        self
    }

    pub(crate) fn delaying_creates(self, delay: Duration) -> Self {
        self.state.lock().unwrap().create_delay = Some(delay);
        self
    }

    pub(crate) fn failing_listing(self) -> Self {
        self.state.lock().unwrap().fail_listing = true;
        self
    }

    /// Moves the head of the pull request, as a push during a run would.
    pub(crate) fn push_head(&self, head_sha: &str) {
        self.state.lock().unwrap().head_sha = head_sha.to_string();
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub(crate) fn comments(&self) -> Vec<ReviewComment> {
        self.state.lock().unwrap().comments.clone()
    }
}

#[async_trait]
impl PullRequestProvider for FakeProvider {
    async fn get_pull_request(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        Ok(PullRequest {
            number: pr_number,
            title: "feat: add network module".to_string(),
            body: None,
            head_sha: self.state.lock().unwrap().head_sha.clone(),
        })
    }

    async fn get_pull_request_files(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        Ok(self.state.lock().unwrap().files.clone())
    }

    async fn list_review_comments(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<ReviewComment>, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(Error::AuthError("Bad credentials".to_string()));
        }

        Ok(state.comments.clone())
    }

    async fn create_review_comment(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        comment: &NewReviewComment,
    ) -> Result<ReviewComment, Error> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.create_calls += 1;
            state.create_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing_calls.contains(&state.create_calls) {
            return Err(Error::ApiError("Server Error".to_string()));
        }

        if state.remotely_rejected_paths.contains(&comment.path) {
            return Err(Error::NotPartOfDiff(
                "pull_request_review_thread.line must be part of the diff".to_string(),
            ));
        }

        // The platform reports the lines a comment covers, like GitHub does
        let (position, start_line, line) = match comment.anchor {
            CommentAnchor::Position(position) => {
                let line = state
                    .files
                    .iter()
                    .find(|f| f.filename == comment.path)
                    .and_then(|f| parse_patch(&f.filename, f.patch.as_deref()?).ok())
                    .and_then(|f| f.line_at_position(position));
                (Some(position), None, line)
            }
            CommentAnchor::Lines { start_line, line } => (None, Some(start_line), Some(line)),
        };

        let created = ReviewComment {
            id: state.comments.len() as u64 + 1,
            path: comment.path.clone(),
            body: comment.body.clone(),
            commit_id: Some(comment.commit_id.clone()),
            position,
            original_position: position,
            line,
            start_line,
            original_line: line,
            original_start_line: start_line,
            user: None,
        };
        state.comments.push(created.clone());

        Ok(created)
    }
}
