//! Reads the pull request number from the workflow event payload.

use std::{fs, path::Path};

use serde_json::Value;
use tracing::debug;

use crate::errors::CliError;

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

/// Location of the event payload inside the GitHub Actions container
pub const DEFAULT_EVENT_PATH: &str = "/github/workflow/event.json";

fn as_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extracts the pull request number from an event payload.
///
/// Pull request events carry it as `number`, other events that reference a
/// pull request as `pull_request.number`.
pub fn pull_request_number(event: &Value) -> Result<u64, CliError> {
    event
        .get("number")
        .and_then(as_number)
        .or_else(|| {
            event
                .get("pull_request")
                .and_then(|pr| pr.get("number"))
                .and_then(as_number)
        })
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            CliError::InvalidArguments(
                "The event payload does not reference a pull request".to_string(),
            )
        })
}

/// Reads an event payload file and extracts the pull request number.
pub fn read_pull_request_number(path: &Path) -> Result<u64, CliError> {
    debug!("Reading the event payload from {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| {
        CliError::ConfigError(format!("Failed to read event file {:?}: {}", path, e))
    })?;
    let event: Value = serde_json::from_str(&content).map_err(|e| {
        CliError::ConfigError(format!("Failed to parse event file {:?}: {}", path, e))
    })?;

    pull_request_number(&event)
}
