use std::time::Duration;

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::{
    errors::{is_not_part_of_diff_message, Error},
    models::{CommentAnchor, NewReviewComment, PullRequest, PullRequestFile, ReviewComment},
    PullRequestProvider,
};

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

/// The side of the diff that comments are placed on. Findings always refer to
/// the head version of a file.
const HEAD_SIDE: &str = "RIGHT";

/// The largest page size the GitHub REST API accepts.
const PAGE_SIZE: u8 = 100;

#[derive(Debug, Serialize)]
struct PageParameters {
    per_page: u8,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    head: CommitReferencePayload,
}

#[derive(Debug, Deserialize)]
struct CommitReferencePayload {
    sha: String,
}

/// Creates an `Octocrab` client authenticated with a personal access token or
/// the token handed to a CI job.
///
/// Every request made through the client is bounded by `timeout` for
/// connecting, reading and writing, so a stalled connection surfaces as an
/// error instead of hanging the run.
///
/// # Arguments
///
/// * `token` - The access token
/// * `timeout` - The maximum duration of each phase of a request
///
/// # Errors
///
/// Returns [`Error::AuthError`] if the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use pr_commenter_developer_platforms::github::{create_token_client, GitHubProvider};
///
/// let client = create_token_client("ghp_example", Duration::from_secs(30)).unwrap();
/// let provider = GitHubProvider::new(client);
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &str, timeout: Duration) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .set_connect_timeout(Some(timeout))
        .set_read_timeout(Some(timeout))
        .set_write_timeout(Some(timeout))
        .build()
        .map_err(|e| {
            Error::AuthError(format!(
                "Failed to create a client for the access token: {}",
                e
            ))
        })
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            status = source.status_code.as_u16(),
            error_message = source.message.as_str(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::Serde { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to decode the response.",
            message
        ),
        octocrab::Error::Json { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to decode the response.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}

/// Translates an `octocrab` error into a platform [`Error`], keeping the
/// distinction between "the anchor is not part of the diff" and other failures.
fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    log_octocrab_error(message, &e);

    match e {
        octocrab::Error::GitHub { source, .. } => {
            let details = match &source.errors {
                Some(errors) => format!(
                    "{} {}",
                    source.message,
                    serde_json::to_string(errors).unwrap_or_default()
                ),
                None => source.message.clone(),
            };

            match source.status_code.as_u16() {
                401 => Error::AuthError(source.message),
                403 | 429 if details.to_ascii_lowercase().contains("rate limit") => {
                    Error::RateLimitExceeded
                }
                429 => Error::RateLimitExceeded,
                403 => Error::AuthError(source.message),
                422 if is_not_part_of_diff_message(&details) => Error::NotPartOfDiff(details),
                422 => Error::FailedToUpdatePullRequest(details),
                _ => Error::ApiError(source.message),
            }
        }
        octocrab::Error::Serde { source, .. } => Error::InvalidResponse(source.to_string()),
        octocrab::Error::Json { source, .. } => Error::InvalidResponse(source.to_string()),
        other => Error::ApiError(other.to_string()),
    }
}

/// Builds the request body for creating a review comment.
fn review_comment_payload(comment: &NewReviewComment) -> serde_json::Value {
    match comment.anchor {
        CommentAnchor::Position(position) => json!({
            "body": comment.body,
            "commit_id": comment.commit_id,
            "path": comment.path,
            "position": position,
        }),
        CommentAnchor::Lines { start_line, line } => json!({
            "body": comment.body,
            "commit_id": comment.commit_id,
            "path": comment.path,
            "start_line": start_line,
            "start_side": HEAD_SIDE,
            "line": line,
            "side": HEAD_SIDE,
        }),
    }
}

/// A [`PullRequestProvider`] backed by the GitHub REST API.
#[derive(Debug)]
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Fetches every page of a list endpoint.
    ///
    /// Unlike a best-effort listing, a failure on any page is returned as an
    /// error so callers never act on a partial list.
    async fn get_all_pages<T>(&self, route: &str, description: &str) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let parameters = PageParameters {
            per_page: PAGE_SIZE,
        };
        let mut current_page: Page<T> = self
            .client
            .get(route, Some(&parameters))
            .await
            .map_err(|e| map_octocrab_error(description, e))?;

        let mut items = current_page.take_items();
        let mut page_count = 1;
        while let Some(mut new_page) = self
            .client
            .get_page::<T>(&current_page.next)
            .await
            .map_err(|e| map_octocrab_error(description, e))?
        {
            items.extend(new_page.take_items());
            page_count += 1;

            current_page = new_page;
        }

        debug!(
            route = route,
            pages = page_count,
            count = items.len(),
            "Fetched all pages"
        );

        Ok(items)
    }
}

#[async_trait]
impl PullRequestProvider for GitHubProvider {
    #[instrument(skip(self))]
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        let route = format!("/repos/{}/{}/pulls/{}", repo_owner, repo_name, pr_number);
        let payload: PullRequestPayload = self
            .client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get pull request information", e))?;

        Ok(PullRequest {
            number: payload.number,
            title: payload.title.unwrap_or_default(),
            body: payload.body,
            head_sha: payload.head.sha,
        })
    }

    #[instrument(skip(self))]
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/files",
            repo_owner, repo_name, pr_number
        );
        self.get_all_pages(&route, "Failed to list the files of the pull request")
            .await
    }

    #[instrument(skip(self))]
    async fn list_review_comments(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewComment>, Error> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/comments",
            repo_owner, repo_name, pr_number
        );
        self.get_all_pages(&route, "Failed to list review comments for pull request")
            .await
    }

    #[instrument(skip(self, comment), fields(path = comment.path.as_str()))]
    async fn create_review_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &NewReviewComment,
    ) -> Result<ReviewComment, Error> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/comments",
            repo_owner, repo_name, pr_number
        );
        let payload = review_comment_payload(comment);

        let created: ReviewComment = self
            .client
            .post(route, Some(&payload))
            .await
            .map_err(|e| map_octocrab_error("Failed to create review comment", e))?;

        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            comment = created.id,
            "Created review comment",
        );

        Ok(created)
    }
}
