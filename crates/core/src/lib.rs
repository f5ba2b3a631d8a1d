//! # PR Commenter Core
//!
//! Places static-analysis findings on a pull request as inline review comments.
//!
//! For every finding the engine:
//! - skips it if an equivalent comment (same file, lines and body) is already there
//! - resolves its end line to a position in the pull request diff, and rejects it
//!   if the line is not part of the diff
//! - posts the comment anchored on the head commit captured at session start
//!
//! Each finding produces one [`WriteOutcome`]: `Posted`, `Duplicate`, `Rejected`
//! or `Failed`. Only `Failed` is an error, and a failure never stops the batch.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pr_commenter_core::{Finding, PullRequestId, Session, SessionOptions};
//! use pr_commenter_developer_platforms::PullRequestProvider;
//!
//! async fn annotate<P: PullRequestProvider>(provider: P) -> anyhow::Result<()> {
//!     let pull_request = PullRequestId::new("owner", "repo", 123);
//!     let mut session = Session::open(provider, pull_request, SessionOptions::default()).await?;
//!
//!     let findings = vec![Finding::new("main.tf", 12, 13, "bucket is public")];
//!     let summary = session.write_all(findings).await;
//!
//!     for (finding, error) in summary.failures() {
//!         eprintln!("{}: {}", finding.path, error);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::fmt;

pub mod diff;
pub mod errors;
pub mod existing;
pub mod finding;
pub mod fingerprint;
pub mod outcome;
pub mod session;
pub mod writer;

pub use finding::Finding;
pub use outcome::{BatchSummary, OutcomeKind, RejectReason, WriteOutcome};
pub use session::{Session, SessionOptions};

#[cfg(test)]
#[path = "test_provider.rs"]
mod test_provider;

/// Identifies a pull request on a hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestId {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
