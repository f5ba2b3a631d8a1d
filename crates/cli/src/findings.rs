//! Turns a tfsec JSON report into findings with Markdown comment bodies.

use std::{fs, path::Path};

use indoc::formatdoc;
use pr_commenter_core::Finding;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::CliError;

#[cfg(test)]
#[path = "findings_tests.rs"]
mod tests;

/// Where a result was found, as reported by tfsec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// One entry of a tfsec report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TfsecResult {
    pub rule_id: String,

    #[serde(default)]
    pub legacy_rule_id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: String,

    #[serde(default)]
    pub links: Vec<String>,

    pub location: Location,
}

#[derive(Debug, Deserialize)]
struct Report {
    // tfsec writes `null` when nothing was found
    #[serde(default)]
    results: Option<Vec<TfsecResult>>,
}

/// Parses the content of a tfsec JSON report.
pub fn parse_report(content: &str) -> Result<Vec<TfsecResult>, CliError> {
    let report: Report = serde_json::from_str(content).map_err(|e| {
        CliError::InvalidArguments(format!("Failed to parse the results file: {}", e))
    })?;

    Ok(report.results.unwrap_or_default())
}

/// Renders the review comment for a result.
pub fn comment_body(result: &TfsecResult) -> String {
    let mut body = formatdoc!(
        "
        ## result
        tfsec check {rule_id} failed.
        ## severity
        ⚠️{severity}
        ## reason
        {description}
        ## how to ignore
        `#tfsec:ignore:{legacy_rule_id}`([refs](https://github.com/aquasecurity/tfsec#ignoring-warnings))
        ",
        rule_id = result.rule_id,
        severity = result.severity,
        description = result.description,
        legacy_rule_id = result.legacy_rule_id,
    );

    if let Some(link) = result.links.first() {
        body.push_str(&format!("\nFor more information, [see]({})\n", link));
    }

    body
}

/// Makes a report file name relative to the repository root.
pub fn relative_path<'a>(filename: &'a str, workspace: Option<&str>) -> &'a str {
    match workspace {
        Some(workspace) if !workspace.is_empty() => {
            let prefix = format!("{}/", workspace.trim_end_matches('/'));
            filename.strip_prefix(prefix.as_str()).unwrap_or(filename)
        }
        _ => filename,
    }
}

pub fn to_finding(result: &TfsecResult, workspace: Option<&str>) -> Finding {
    Finding::new(
        relative_path(&result.location.filename, workspace),
        result.location.start_line,
        result.location.end_line,
        comment_body(result),
    )
}

/// Reads a tfsec report file and converts every result into a finding.
pub fn load_findings(path: &Path, workspace: Option<&str>) -> Result<Vec<Finding>, CliError> {
    debug!("Reading the results from {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| {
        CliError::ConfigError(format!("Failed to read results file {:?}: {}", path, e))
    })?;
    let results = parse_report(&content)?;
    info!(results = results.len(), "Loaded analysis results");

    Ok(results.iter().map(|r| to_finding(r, workspace)).collect())
}
