use std::time::Duration;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while reading a file's patch into hunks.
///
/// A parse error only affects the file it was raised for. Every line of that
/// file is then treated as not being part of the diff.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Patch line {line} is not preceded by a hunk header")]
    MissingHunkHeader { line: usize },

    #[error("Invalid hunk header on patch line {line}: '{header}'")]
    InvalidHunkHeader { line: usize, header: String },

    #[error("Unexpected content on patch line {line}: '{content}'")]
    UnexpectedLine { line: usize, content: String },

    #[error("Line numbers overflow on patch line {line}")]
    LineNumberOverflow { line: usize },
}

#[derive(Error, Debug)]
pub enum CommenterError {
    #[error("Git provider error: {0}")]
    GitProviderError(#[from] pr_commenter_developer_platforms::errors::Error),

    #[error("Timed out after {after:?} while trying to {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}
