#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// This enum represents the failures that can occur when reading a pull request
/// or writing review comments on a developer platform like GitHub. The variants
/// are chosen so that callers can tell the expected "this anchor is not part of
/// the diff" rejection apart from genuine failures.
///
/// # Examples
///
/// ```rust
/// use pr_commenter_developer_platforms::errors::Error;
///
/// let auth_error = Error::AuthError("Bad credentials".to_string());
/// assert_eq!(auth_error.to_string(), "Authentication failed: Bad credentials");
///
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// Used for transport failures, server errors and any remote rejection that
    /// does not map onto a more specific variant. The string carries the message
    /// reported by the platform.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// The provided credentials are invalid, expired, or lack the permissions
    /// needed to read the pull request or write review comments.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Failed to update pull request.
    ///
    /// A write to the pull request was refused for a reason other than the
    /// comment anchor being outside the diff.
    #[error("Failed to update the PR: {0}")]
    FailedToUpdatePullRequest(String),

    /// Invalid response format from platform API.
    ///
    /// The response could not be decoded into the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The platform refused a review comment because its anchor is not part of
    /// the pull request diff.
    ///
    /// This happens when the commit SHA used for the comment is stale, or the
    /// targeted lines were force-pushed away after the diff was read.
    #[error("Comment anchor is not part of the diff: {0}")]
    NotPartOfDiff(String),

    /// Platform rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Error {
    /// Returns `true` when the platform rejected a comment anchor as being outside
    /// the pull request diff.
    pub fn is_not_part_of_diff(&self) -> bool {
        matches!(self, Error::NotPartOfDiff(_))
    }
}

/// Fragments of platform validation messages that mean "the anchor is not in the diff".
const NOT_PART_OF_DIFF_MESSAGES: [&str; 5] = [
    "must be part of the diff",
    "part of the same hunk",
    "could not be resolved",
    "is outside the diff",
    "is not part of the pull request",
];

/// Checks whether a validation message reported by the platform indicates that
/// the comment anchor is not part of the pull request diff.
///
/// # Examples
///
/// ```rust
/// use pr_commenter_developer_platforms::errors::is_not_part_of_diff_message;
///
/// assert!(is_not_part_of_diff_message(
///     "pull_request_review_thread.line must be part of the diff"
/// ));
/// assert!(!is_not_part_of_diff_message("Bad credentials"));
/// ```
pub fn is_not_part_of_diff_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    NOT_PART_OF_DIFF_MESSAGES
        .iter()
        .any(|fragment| message.contains(fragment))
}
