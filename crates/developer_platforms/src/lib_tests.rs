//! Tests for the PullRequestProvider trait surface

use crate::errors::Error;
use crate::models::{
    CommentAnchor, NewReviewComment, PullRequest, PullRequestFile, ReviewComment,
};
use crate::PullRequestProvider;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock implementation that stores created comments in memory
#[derive(Debug, Default)]
struct MockApiProvider {
    comments: Mutex<Vec<ReviewComment>>,
}

#[async_trait]
impl PullRequestProvider for MockApiProvider {
    async fn get_pull_request(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        Ok(PullRequest {
            number: pr_number,
            title: "feat: add new feature".to_string(),
            body: None,
            head_sha: "abc123".to_string(),
        })
    }

    async fn get_pull_request_files(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        Ok(vec![])
    }

    async fn list_review_comments(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<ReviewComment>, Error> {
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_review_comment(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        comment: &NewReviewComment,
    ) -> Result<ReviewComment, Error> {
        let mut comments = self.comments.lock().unwrap();
        let (start_line, line, position) = match comment.anchor {
            CommentAnchor::Position(position) => (None, None, Some(position)),
            CommentAnchor::Lines { start_line, line } => (Some(start_line), Some(line), None),
        };

        let created = ReviewComment {
            id: comments.len() as u64 + 1,
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
        comments.push(created.clone());

        Ok(created)
    }
}

#[tokio::test]
async fn test_provider_is_usable_as_trait_object() {
    let provider: Box<dyn PullRequestProvider> = Box::new(MockApiProvider::default());

    let pr = provider.get_pull_request("owner", "repo", 3).await.unwrap();
    assert_eq!(pr.number, 3);
    assert_eq!(pr.head_sha, "abc123");
}

#[tokio::test]
async fn test_created_comments_are_listed() {
    let provider = MockApiProvider::default();
    let comment = NewReviewComment {
        path: "main.tf".to_string(),
        body: "X".to_string(),
        commit_id: "abc123".to_string(),
        anchor: CommentAnchor::Lines {
            start_line: 4,
            line: 6,
        },
    };

    let created = provider
        .create_review_comment("owner", "repo", 3, &comment)
        .await
        .unwrap();
    let listed = provider
        .list_review_comments("owner", "repo", 3)
        .await
        .unwrap();

    assert_eq!(listed, vec![created]);
    assert_eq!(listed[0].start_line, Some(4));
    assert_eq!(listed[0].line, Some(6));
}
