use pr_commenter_core::errors::CommenterError;
use pr_commenter_developer_platforms::errors::Error;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Some findings could not be written
    #[error("Failed to write {0} comment(s)")]
    CommentsFailed(usize),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err.to_string())
    }
}

impl From<CommenterError> for CliError {
    fn from(err: CommenterError) -> Self {
        match err {
            CommenterError::GitProviderError(Error::AuthError(message)) => {
                CliError::AuthError(message)
            }
            CommenterError::GitProviderError(e) => CliError::NetworkError(e.to_string()),
            e @ CommenterError::Timeout { .. } => CliError::NetworkError(e.to_string()),
        }
    }
}

impl std::process::Termination for CliError {
    fn report(self) -> std::process::ExitCode {
        match self {
            CliError::ConfigError(_) => std::process::ExitCode::from(2),
            CliError::AuthError(_) => std::process::ExitCode::from(3),
            CliError::NetworkError(_) => std::process::ExitCode::from(4),
            CliError::InvalidArguments(_) => std::process::ExitCode::from(5),
            CliError::CommentsFailed(_) => std::process::ExitCode::from(1),
            CliError::Other(_) => std::process::ExitCode::FAILURE,
        }
    }
}
