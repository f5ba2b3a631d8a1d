use async_trait::async_trait;

pub mod errors;

pub mod github;

pub mod models;
use errors::Error;
use models::{NewReviewComment, PullRequest, PullRequestFile, ReviewComment};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for interacting with developer platforms that host pull requests (e.g., GitHub).
///
/// Implementations provide the operations needed to place inline review comments:
/// reading the pull request's head commit and per-file patches, listing the
/// review comments that already exist and creating new ones.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use pr_commenter_developer_platforms::{
///     errors::Error,
///     models::{NewReviewComment, PullRequest, PullRequestFile, ReviewComment},
///     PullRequestProvider,
/// };
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct InMemoryProvider {
///     head_sha: String,
/// }
///
/// #[async_trait]
/// impl PullRequestProvider for InMemoryProvider {
///     async fn get_pull_request(
///         &self,
///         _repo_owner: &str,
///         _repo_name: &str,
///         pr_number: u64,
///     ) -> Result<PullRequest, Error> {
///         Ok(PullRequest {
///             number: pr_number,
///             title: "test".to_string(),
///             body: None,
///             head_sha: self.head_sha.clone(),
///         })
///     }
///
///     // Implement other required methods...
///     # async fn get_pull_request_files(&self, _: &str, _: &str, _: u64) -> Result<Vec<PullRequestFile>, Error> { unimplemented!() }
///     # async fn list_review_comments(&self, _: &str, _: &str, _: u64) -> Result<Vec<ReviewComment>, Error> { unimplemented!() }
///     # async fn create_review_comment(&self, _: &str, _: &str, _: u64, _: &NewReviewComment) -> Result<ReviewComment, Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    /// Retrieves a pull request from the Git provider.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    ///
    /// # Returns
    ///
    /// A `Result` containing the pull request information, including the SHA
    /// of the head commit
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error>;

    /// Gets the list of files changed in a pull request together with their patches.
    ///
    /// Implementations must follow pagination until every changed file has been returned.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of file changes
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error>;

    /// Lists all inline review comments on a pull request.
    ///
    /// Implementations must follow pagination until every comment has been returned.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of review comments
    async fn list_review_comments(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewComment>, Error>;

    /// Creates an inline review comment on a pull request.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `comment` - The comment to create, including its commit and diff anchor
    ///
    /// # Returns
    ///
    /// A `Result` containing the created comment. When the platform refuses the
    /// anchor because it is not part of the diff the error is
    /// [`Error::NotPartOfDiff`].
    async fn create_review_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &NewReviewComment,
    ) -> Result<ReviewComment, Error>;
}
