use super::*;
use pr_commenter_core::{
    errors::CommenterError, existing::PostedComment, fingerprint::Fingerprint, Finding,
    RejectReason,
};
use pr_commenter_developer_platforms::errors::Error;

fn finding(line: u32) -> Finding {
    Finding::new("main.tf", line, line, format!("finding on line {}", line))
}

fn posted(finding: &Finding) -> WriteOutcome {
    WriteOutcome::Posted(PostedComment {
        path: finding.path.clone(),
        start_line: finding.start_line,
        end_line: finding.end_line,
        fingerprint: Fingerprint::of(&finding.body),
        position: Some(1),
        id: Some(1),
        commit_id: Some("abc123".to_string()),
    })
}

#[test]
fn test_resolve_token_prefers_explicit_token() {
    assert_eq!(
        resolve_token(Some("ghp_explicit".to_string())).unwrap(),
        "ghp_explicit"
    );
}

#[test]
fn test_report_without_failures() {
    let mut summary = BatchSummary::default();
    let first = finding(1);
    summary.push(first.clone(), posted(&first));
    summary.push(finding(2), WriteOutcome::Duplicate);
    summary.push(
        finding(3),
        WriteOutcome::Rejected(RejectReason::RemoteRejected("outdated".to_string())),
    );

    assert!(report(&summary).is_ok());
}

#[test]
fn test_report_counts_failures() {
    let mut summary = BatchSummary::default();
    let first = finding(1);
    summary.push(first.clone(), posted(&first));
    summary.push(
        finding(2),
        WriteOutcome::Failed(CommenterError::GitProviderError(Error::ApiError(
            "Server Error".to_string(),
        ))),
    );
    summary.push(
        finding(3),
        WriteOutcome::Failed(CommenterError::Timeout {
            operation: "create a review comment",
            after: std::time::Duration::from_secs(30),
        }),
    );

    assert!(matches!(report(&summary), Err(CliError::CommentsFailed(2))));
}

#[test]
fn test_report_empty_batch() {
    assert!(report(&BatchSummary::default()).is_ok());
}
