//! # Models
//!
//! This module contains the data models exchanged with developer platforms.
//!
//! The field names follow the GitHub REST API so that list responses can be
//! deserialized straight into these types. Fields the platform may omit are
//! optional and default to `None`.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a user on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier of the user
    pub id: u64,

    /// The login name of the user
    pub login: String,
}

/// Represents a pull request from a Git provider.
///
/// Only the information needed to anchor review comments is kept.
///
/// # Examples
///
/// ```
/// use pr_commenter_developer_platforms::models::PullRequest;
///
/// let pr = PullRequest {
///     number: 123,
///     title: "feat(network): restrict ingress".to_string(),
///     body: None,
///     head_sha: "6dcb09b5b57875f334f61aebed695e2e4193db5e".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number
    pub number: u64,

    /// The title of the pull request
    pub title: String,

    /// The description/body of the pull request, if any
    pub body: Option<String>,

    /// The SHA of the commit at the head of the pull request branch
    pub head_sha: String,
}

/// Represents a file changed in a pull request.
///
/// # Fields
///
/// * `filename` - The path of the file relative to the repository root
/// * `status` - The change status ("added", "modified", "removed", "renamed", ...)
/// * `additions` - Number of lines added
/// * `deletions` - Number of lines deleted
/// * `changes` - Total number of changed lines
/// * `patch` - The unified diff for the file. Absent for binary files and for
///   files whose diff is too large for the platform to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// The path of the file relative to the repository root
    pub filename: String,

    /// The change status of the file
    pub status: String,

    /// Number of lines added
    #[serde(default)]
    pub additions: u32,

    /// Number of lines deleted
    #[serde(default)]
    pub deletions: u32,

    /// Total number of changed lines
    #[serde(default)]
    pub changes: u32,

    /// The unified diff of the file, if the platform provided one
    #[serde(default)]
    pub patch: Option<String>,
}

/// Represents an inline review comment on a pull request.
///
/// `line`/`start_line` describe where the comment currently sits in the
/// head version of the file. When the platform can no longer map the comment
/// onto the current diff those are `None` and only the `original_*` values
/// and the diff `position` remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// The unique identifier of the comment
    pub id: u64,

    /// The path of the commented file relative to the repository root
    pub path: String,

    /// The text content of the comment
    #[serde(default)]
    pub body: String,

    /// The commit the comment was anchored on
    #[serde(default)]
    pub commit_id: Option<String>,

    /// The diff position the comment is anchored on
    #[serde(default)]
    pub position: Option<u32>,

    /// The diff position the comment was originally anchored on
    #[serde(default)]
    pub original_position: Option<u32>,

    /// The last line of the commented range
    #[serde(default)]
    pub line: Option<u32>,

    /// The first line of the commented range, for multi-line comments
    #[serde(default)]
    pub start_line: Option<u32>,

    /// The last line of the commented range at the time the comment was made
    #[serde(default)]
    pub original_line: Option<u32>,

    /// The first line of the commented range at the time the comment was made
    #[serde(default)]
    pub original_start_line: Option<u32>,

    /// The author of the comment
    #[serde(default)]
    pub user: Option<User>,
}

/// Where a new review comment is attached in the pull request diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAnchor {
    /// A single line, addressed by its diff position.
    Position(u32),

    /// A range of lines on the head side of the diff, addressed by line number.
    Lines {
        /// The first line of the range
        start_line: u32,

        /// The last line of the range
        line: u32,
    },
}

/// A review comment to be created on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewComment {
    /// The path of the file relative to the repository root
    pub path: String,

    /// The Markdown text of the comment
    pub body: String,

    /// The commit SHA the comment is anchored on
    pub commit_id: String,

    /// Where in the diff the comment is attached
    pub anchor: CommentAnchor,
}
